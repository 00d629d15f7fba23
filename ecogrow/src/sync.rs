use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, instrument, trace, warn};

use crate::remote::{Actuators, DeviceIdentity, RemoteStore, RemoteSyncClient};

/// Shortest interval the loop accepts
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// How often the loop talks to the store
#[derive(Clone, Debug)]
pub struct Schedule {
    pub state_file: PathBuf,
    pub state_interval: Duration,
    pub command_interval: Duration,
}

#[derive(Debug, Error)]
pub enum ReadStateError {
    #[error("failed to read {0}: {1}")]
    Read(String, #[source] io::Error),

    #[error("{0} is empty")]
    Empty(String),
}

/// Read the local state document as-is.
pub async fn read_state(path: &Path) -> Result<String, ReadStateError> {
    let state = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| ReadStateError::Read(path.display().to_string(), err))?;

    let state = state.trim();
    if state.is_empty() {
        return Err(ReadStateError::Empty(path.display().to_string()));
    }

    Ok(state.to_owned())
}

/// Push the local state once, reporting unreadable state to the remote.
async fn sync_state<S, A, I>(client: &mut RemoteSyncClient<S, A, I>, state_file: &Path)
where
    S: RemoteStore,
    A: Actuators,
    I: DeviceIdentity,
{
    match read_state(state_file).await {
        Ok(state) => {
            if client.push_state(&state).await {
                trace!("state pushed");
            }
        }
        Err(err) => {
            warn!("{err}");
            client
                .push_error(&format!("failed to read local state: {err}"))
                .await;
        }
    }
}

/// Drive the client on a fixed cadence.
///
/// Connects first, then pushes state and polls for commands on their own
/// intervals, one operation at a time. Never returns.
#[instrument(name = "sync", skip_all)]
pub async fn start_sync<S, A, I>(mut client: RemoteSyncClient<S, A, I>, schedule: Schedule)
where
    S: RemoteStore,
    A: Actuators,
    I: DeviceIdentity,
{
    client.initialize().await;

    let mut state_timer = interval(schedule.state_interval.max(MIN_INTERVAL));
    state_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut command_timer = interval(schedule.command_interval.max(MIN_INTERVAL));
    command_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = state_timer.tick() => {
                sync_state(&mut client, &schedule.state_file).await;
            }
            _ = command_timer.tick() => {
                if client.pull_commands().await {
                    debug!("processed remote commands");
                }
            }
        }
    }
}
