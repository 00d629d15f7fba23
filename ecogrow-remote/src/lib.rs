/*
This crate is home to everything related to the realtime database backend
that mirrors the device we're running on.

It provides the store seam and its HTTP implementation, device registration,
state pushes, command polling and error reporting, and the bookkeeping
needed to reconnect after the store becomes unreachable.
*/

mod client;
mod command;
mod config;
mod documents;
mod identity;
mod rtdb;
mod state;
mod store;

#[cfg(test)]
mod testing;

pub use client::RemoteSyncClient;
pub use command::{Actuator, Actuators, process_command};
pub use config::{BufferSizes, RemoteConfig, RequestConfig};
pub use documents::{DeviceInfo, ErrorReport, StorePath};
pub use identity::{DeviceIdentity, SystemIdentity};
pub use rtdb::RtdbStore;
pub use state::ConnectionState;
pub use store::{RemoteStore, StoreError};

use ecogrow_util as util;
