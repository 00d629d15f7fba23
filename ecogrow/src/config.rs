use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::cli::Cli;
use crate::remote::{BufferSizes, RemoteConfig, RequestConfig};
use crate::util::config::{LoadConfigError, StoredConfig, load};
use crate::util::http::Uri;
use crate::util::types::AuthToken;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] LoadConfigError),

    #[error("Missing remote {0}, use --{0} or set it in the config file")]
    Missing(&'static str),
}

/// Remote settings as stored in the config file.
///
/// Every field is optional, anything left out falls back to the command
/// line or the defaults.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct StoredRemoteConfig {
    host: Option<Uri>,
    auth_token: Option<AuthToken>,
    firmware_version: Option<String>,
    buffer_sizes: BufferSizes,
    request: RequestConfig,
}

impl StoredConfig for StoredRemoteConfig {
    fn kind() -> &'static str {
        "remote"
    }
}

/// Build the remote configuration.
///
/// Values given on the command line (or through the environment) take
/// precedence over those read from the config file. The host and auth
/// token must come from one of the two.
pub async fn resolve(cli: &Cli) -> Result<RemoteConfig, ConfigError> {
    let stored: Option<StoredRemoteConfig> = match &cli.config {
        Some(path) => load(path).await?,
        None => None,
    };

    if cli.config.is_some() && stored.is_none() {
        debug!("config file not found, using command line only");
    }
    let stored = stored.unwrap_or_default();

    let host = cli
        .host
        .clone()
        .or(stored.host)
        .ok_or(ConfigError::Missing("host"))?;

    let auth_token = cli
        .auth_token
        .clone()
        .or(stored.auth_token)
        .ok_or(ConfigError::Missing("auth-token"))?;

    let mut config = RemoteConfig::new(host, auth_token);
    if let Some(version) = cli.firmware_version.clone().or(stored.firmware_version) {
        config.firmware_version = version;
    }
    config.buffer_sizes = BufferSizes {
        rx: cli.rx_buffer.unwrap_or(stored.buffer_sizes.rx),
        tx: cli.tx_buffer.unwrap_or(stored.buffer_sizes.tx),
        response: cli.response_limit.unwrap_or(stored.buffer_sizes.response),
    };
    config.request = RequestConfig {
        timeout: cli.request_timeout.unwrap_or(stored.request.timeout),
        reconnect_interval: cli
            .reconnect_interval
            .unwrap_or(stored.request.reconnect_interval),
    };

    Ok(config)
}
