use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// A configuration that can be read from a JSON file on disk.
pub trait StoredConfig
where
    Self: Serialize,
    Self: DeserializeOwned,
{
    fn kind() -> &'static str;
}

#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(String, #[source] io::Error),

    #[error("Failed to decode config file {0}: {1}")]
    Decode(String, #[source] serde_json::Error),
}

/// Load and decode the config stored at `path`.
///
/// Returns `None` if the file does not exist.
pub async fn load<C: StoredConfig>(path: &Path) -> Result<Option<C>, LoadConfigError> {
    debug!("reading {} config from {}", C::kind(), path.display());
    let contents = match tokio::fs::read(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(LoadConfigError::Read(path.display().to_string(), err)),
    };

    let config = serde_json::from_slice(&contents)
        .map_err(|err| LoadConfigError::Decode(path.display().to_string(), err))?;

    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tempfile::tempdir;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        host: String,
    }

    impl StoredConfig for Sample {
        fn kind() -> &'static str {
            "sample"
        }
    }

    #[tokio::test]
    async fn it_loads_a_stored_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, r#"{"host": "example.com"}"#).unwrap();

        let config: Option<Sample> = load(&path).await.unwrap();
        assert_eq!(
            config,
            Some(Sample {
                host: "example.com".to_owned()
            })
        );
    }

    #[tokio::test]
    async fn it_returns_none_for_missing_files() {
        let dir = tempdir().unwrap();
        let config: Option<Sample> = load(&dir.path().join("missing.json")).await.unwrap();
        assert_eq!(config, None);
    }

    #[tokio::test]
    async fn it_fails_on_malformed_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, "{ host").unwrap();

        let result: Result<Option<Sample>, _> = load(&path).await;
        assert!(matches!(result, Err(LoadConfigError::Decode(_, _))));
    }
}
