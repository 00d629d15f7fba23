use tracing::{debug, error, info, instrument, trace, warn};

use crate::util::types::DeviceId;

use super::command::{Actuators, process_command};
use super::config::RemoteConfig;
use super::documents::{
    CANARY_PATH, CANARY_VALUE, DeviceInfo, EMPTY_DOCUMENT, ErrorReport, StorePath,
};
use super::identity::DeviceIdentity;
use super::state::ConnectionState;
use super::store::RemoteStore;

/// Keeps a device in sync with its records on the remote store.
///
/// None of the operations retry on their own. Callers are expected to
/// invoke them on a fixed cadence: a failed [`push_state`] is retried by
/// calling it again on the next cycle, and it is also what triggers
/// reconnection, at most once per reconnect interval.
///
/// Failures are never returned as errors. They are logged and reflected
/// in the connection state and the boolean results.
///
/// [`push_state`]: RemoteSyncClient::push_state
pub struct RemoteSyncClient<S, A, I> {
    config: RemoteConfig,
    store: S,
    actuators: A,
    identity: I,
    state: ConnectionState,
}

impl<S, A, I> RemoteSyncClient<S, A, I>
where
    S: RemoteStore,
    A: Actuators,
    I: DeviceIdentity,
{
    pub fn new(config: RemoteConfig, store: S, actuators: A, identity: I) -> Self {
        Self::with_state(config, store, actuators, identity, ConnectionState::new())
    }

    pub fn with_state(
        config: RemoteConfig,
        store: S,
        actuators: A,
        identity: I,
        state: ConnectionState,
    ) -> Self {
        Self {
            config,
            store,
            actuators,
            identity,
            state,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Current device id, empty until the first successful connection
    pub fn device_id(&self) -> &DeviceId {
        self.state.device_id()
    }

    /// Connect to the store and register the device.
    ///
    /// Reachability is verified by writing a canary value. On success the
    /// device id is assigned (once) and the device info document is
    /// overwritten. Safe to call repeatedly.
    #[instrument(skip_all)]
    pub async fn initialize(&mut self) {
        info!(host = %self.config.host, "connecting to remote store");

        if let Err(err) = self.store.set_string(CANARY_PATH, CANARY_VALUE).await {
            self.state.mark_disconnected();
            error!("connection failed: {err}");
            return;
        }

        self.state.mark_connected();
        self.state.assign_device_id(|| self.identity.device_id());
        info!(device_id = %self.state.device_id(), "connected");

        self.register().await;
    }

    async fn register(&mut self) {
        let device_id = self.state.device_id().clone();
        let info = DeviceInfo {
            device_id: device_id.clone(),
            ip_address: self.identity.ip_address(),
            mac_address: self.identity.mac_address(),
            firmware_version: self.config.firmware_version.clone(),
            last_seen: chrono::Utc::now().timestamp(),
        };
        trace!(info = ?info, "registering device");

        let path = StorePath::Info.for_device(&device_id);
        if let Err(err) = self.store.set_json(&path, &info).await {
            self.state.mark_disconnected();
            warn!("device registration failed: {err}");
        }
    }

    /// Write an already serialized state document.
    ///
    /// Returns `true` only if the document was written. While disconnected
    /// this never writes, instead it may start a reconnect attempt and
    /// still return `false`.
    #[instrument(skip_all)]
    pub async fn push_state(&mut self, state: &str) -> bool {
        if !self.state.is_connected() {
            let interval = self.config.request.reconnect_interval;
            if self.state.reconnect_due(interval) {
                debug!("attempting to reconnect");
                self.state.record_reconnect_attempt();
                self.initialize().await;
            } else {
                trace!("disconnected, next reconnect within {interval:?}");
            }
            return false;
        }

        let path = StorePath::State.for_device(self.state.device_id());
        match self.store.set_string(&path, state).await {
            Ok(()) => {
                self.state.mark_updated();
                true
            }
            Err(err) => {
                error!("state update failed: {err}");
                self.state.mark_disconnected();
                false
            }
        }
    }

    /// Fetch and process pending commands.
    ///
    /// Returns `true` if a non-empty command document was processed, in
    /// which case the document is replaced with an empty one. Does nothing
    /// while disconnected. Read failures do not change the connection
    /// state.
    #[instrument(skip_all)]
    pub async fn pull_commands(&mut self) -> bool {
        if !self.state.is_connected() {
            return false;
        }

        let path = StorePath::Commands.for_device(self.state.device_id());
        let commands = match self.store.get_string(&path).await {
            Ok(commands) => commands,
            Err(err) => {
                warn!("failed to read commands: {err}");
                return false;
            }
        };

        if commands.len() <= EMPTY_DOCUMENT.len() {
            return false;
        }

        self.process_command(&commands).await;

        if let Err(err) = self.store.set_string(&path, EMPTY_DOCUMENT).await {
            error!("failed to clear processed commands: {err}");
            self.state.mark_disconnected();
        }

        true
    }

    /// Dispatch the commands in `document` to the actuators.
    pub async fn process_command(&mut self, document: &str) {
        process_command(document, &mut self.actuators).await
    }

    /// Append an error report to the device error log.
    ///
    /// Best effort: nothing is sent while disconnected and failures are
    /// only logged.
    #[instrument(skip_all)]
    pub async fn push_error(&mut self, message: &str) {
        if !self.state.is_connected() {
            return;
        }

        let device_id = self.state.device_id().clone();
        let path = StorePath::Errors.for_device(&device_id);
        let report = ErrorReport::new(device_id, message);
        match self.store.push_json(&path, &report).await {
            Ok(key) => trace!("error reported as {key}"),
            Err(err) => debug!("error report dropped: {err}"),
        }
    }
}
