use serde::Serialize;
use std::fmt::Display;

use crate::util::types::DeviceId;

/// Path written to verify the store is reachable
pub(crate) const CANARY_PATH: &str = "/test";
pub(crate) const CANARY_VALUE: &str = "test";

/// The value a processed command document is replaced with
pub(crate) const EMPTY_DOCUMENT: &str = "{}";

/// Per-device locations on the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePath {
    Info,
    State,
    Commands,
    Errors,
}

impl StorePath {
    fn node(&self) -> &'static str {
        match self {
            StorePath::Info => "info",
            StorePath::State => "state",
            StorePath::Commands => "commands",
            StorePath::Errors => "errors",
        }
    }

    /// Full store path of this node for `device_id`
    pub fn for_device(&self, device_id: &DeviceId) -> String {
        format!("/devices/{device_id}/{self}")
    }
}

impl Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.node())
    }
}

/// Device metadata written on every registration
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_id: DeviceId,
    pub ip_address: String,
    pub mac_address: String,
    pub firmware_version: String,
    /// Registration time in unix seconds
    pub last_seen: i64,
}

/// Entry appended to the device error log
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Unix seconds
    pub timestamp: i64,
    pub message: String,
    pub device_id: DeviceId,
}

impl ErrorReport {
    pub fn new(device_id: DeviceId, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp(),
            message: message.into(),
            device_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn it_builds_per_device_paths() {
        let device_id = DeviceId::from("1193046");
        assert_eq!(StorePath::Info.for_device(&device_id), "/devices/1193046/info");
        assert_eq!(StorePath::State.for_device(&device_id), "/devices/1193046/state");
        assert_eq!(
            StorePath::Commands.for_device(&device_id),
            "/devices/1193046/commands"
        );
        assert_eq!(
            StorePath::Errors.for_device(&device_id),
            "/devices/1193046/errors"
        );
    }

    #[test]
    fn it_serializes_device_info_with_snake_case_keys() {
        let info = DeviceInfo {
            device_id: "1193046".into(),
            ip_address: "192.168.1.20".to_owned(),
            mac_address: "5C:CF:7F:12:34:56".to_owned(),
            firmware_version: "4.0".to_owned(),
            last_seen: 1_700_000_000,
        };

        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({
                "device_id": "1193046",
                "ip_address": "192.168.1.20",
                "mac_address": "5C:CF:7F:12:34:56",
                "firmware_version": "4.0",
                "last_seen": 1_700_000_000,
            })
        );
    }

    #[test]
    fn it_timestamps_error_reports() {
        let before = chrono::Utc::now().timestamp();
        let report = ErrorReport::new("1193046".into(), "sensor offline");

        assert!(report.timestamp >= before);
        assert_eq!(report.message, "sensor offline");
        assert_eq!(report.device_id, DeviceId::from("1193046"));
    }
}
