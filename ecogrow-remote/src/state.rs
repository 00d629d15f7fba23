use std::time::Duration;

use tokio::time::Instant;

use crate::util::types::DeviceId;

/// Local mirror of the connection to the remote store.
///
/// `connected` is only true if the most recent write to the store
/// succeeded.
#[derive(Debug, Clone)]
pub struct ConnectionState {
    connected: bool,
    last_update: Instant,
    last_reconnect_attempt: Option<Instant>,
    device_id: DeviceId,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionState {
    pub fn new() -> Self {
        Self {
            connected: false,
            last_update: Instant::now(),
            last_reconnect_attempt: None,
            device_id: DeviceId::default(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Time of the last successful store operation, or process start
    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub(crate) fn mark_connected(&mut self) {
        self.connected = true;
        self.last_update = Instant::now();
    }

    pub(crate) fn mark_updated(&mut self) {
        self.last_update = Instant::now();
    }

    pub(crate) fn mark_disconnected(&mut self) {
        self.connected = false;
    }

    /// Set the device id unless one was already assigned.
    pub(crate) fn assign_device_id(&mut self, device_id: impl FnOnce() -> DeviceId) {
        if self.device_id.is_empty() {
            self.device_id = device_id();
        }
    }

    /// Whether a reconnect attempt is allowed now.
    ///
    /// Both the last successful update and the last attempt need to be at
    /// least `interval` in the past.
    pub(crate) fn reconnect_due(&self, interval: Duration) -> bool {
        self.last_update.elapsed() >= interval
            && self
                .last_reconnect_attempt
                .is_none_or(|attempt| attempt.elapsed() >= interval)
    }

    pub(crate) fn record_reconnect_attempt(&mut self) {
        self.last_reconnect_attempt = Some(Instant::now());
    }
}
