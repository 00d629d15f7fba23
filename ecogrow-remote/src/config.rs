use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::util::http::Uri;
use crate::util::json::{deserialize_duration_from_ms, serialize_duration_to_ms};
use crate::util::types::AuthToken;

/// Remote store configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RemoteConfig {
    pub host: Uri,
    pub auth_token: AuthToken,

    #[serde(default = "default_firmware_version")]
    pub firmware_version: String,

    #[serde(default)]
    pub buffer_sizes: BufferSizes,

    #[serde(default)]
    pub request: RequestConfig,
}

impl RemoteConfig {
    pub fn new(host: Uri, auth_token: AuthToken) -> Self {
        Self {
            host,
            auth_token,
            firmware_version: default_firmware_version(),
            buffer_sizes: BufferSizes::default(),
            request: RequestConfig::default(),
        }
    }
}

fn default_firmware_version() -> String {
    env!("CARGO_PKG_VERSION").to_owned()
}

/// Transport limits, in bytes
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BufferSizes {
    /// Largest raw response body accepted from the store
    pub rx: usize,
    /// Largest request body sent to the store
    pub tx: usize,
    /// Largest decoded value returned by a read
    pub response: usize,
}

impl Default for BufferSizes {
    fn default() -> Self {
        Self {
            rx: 1024,
            tx: 1024,
            response: 1024,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestConfig {
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        serialize_with = "serialize_duration_to_ms"
    )]
    pub timeout: Duration,

    /// Minimum time between automatic reconnect attempts
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        serialize_with = "serialize_duration_to_ms"
    )]
    pub reconnect_interval: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
            reconnect_interval: Duration::from_millis(60_000),
        }
    }
}
