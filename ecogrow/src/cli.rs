use clap::Parser;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use crate::util::http::Uri;
use crate::util::types::{AuthToken, DeviceId};

fn parse_duration(s: &str) -> Result<Duration, ParseIntError> {
    let millis: u64 = s.parse()?;
    Ok(Duration::from_millis(millis))
}

fn parse_interval(s: &str) -> Result<Duration, String> {
    let interval = parse_duration(s).map_err(|err| err.to_string())?;
    if interval.is_zero() {
        return Err("interval must be greater than zero".to_owned());
    }
    Ok(interval)
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)] // read from Cargo.toml
pub struct Cli {
    /// Path to a JSON file with the remote store configuration
    #[arg(env = "ECOGROW_CONFIG", long = "config", value_name = "path")]
    pub config: Option<PathBuf>,

    /// Realtime database host, eg. "my-project-default-rtdb.firebaseio.com"
    #[arg(env = "ECOGROW_HOST", long = "host", value_name = "uri")]
    pub host: Option<Uri>,

    /// Token for authentication with the realtime database
    #[arg(env = "ECOGROW_AUTH_TOKEN", long = "auth-token", value_name = "token")]
    pub auth_token: Option<AuthToken>,

    /// Firmware version reported on registration
    #[arg(
        env = "ECOGROW_FIRMWARE_VERSION",
        long = "firmware-version",
        value_name = "str"
    )]
    pub firmware_version: Option<String>,

    /// Use this device id instead of deriving one from the hardware
    #[arg(env = "ECOGROW_DEVICE_ID", long = "device-id", value_name = "id")]
    pub device_id: Option<DeviceId>,

    /// Remote request timeout in milliseconds
    #[arg(
        env = "ECOGROW_REQUEST_TIMEOUT_MS",
        long = "request-timeout-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub request_timeout: Option<Duration>,

    /// Minimum time between reconnect attempts in milliseconds
    #[arg(
        env = "ECOGROW_RECONNECT_INTERVAL_MS",
        long = "reconnect-interval-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub reconnect_interval: Option<Duration>,

    /// Largest response body accepted from the store, in bytes
    #[arg(env = "ECOGROW_RX_BUFFER", long = "rx-buffer", value_name = "bytes")]
    pub rx_buffer: Option<usize>,

    /// Largest request body sent to the store, in bytes
    #[arg(env = "ECOGROW_TX_BUFFER", long = "tx-buffer", value_name = "bytes")]
    pub tx_buffer: Option<usize>,

    /// Largest value accepted from a store read, in bytes
    #[arg(
        env = "ECOGROW_RESPONSE_LIMIT",
        long = "response-limit",
        value_name = "bytes"
    )]
    pub response_limit: Option<usize>,

    /// File holding the current device state document
    #[arg(
        env = "ECOGROW_STATE_FILE",
        long = "state-file",
        value_name = "path",
        default_value = "/run/ecogrow/state.json"
    )]
    pub state_file: PathBuf,

    /// State push interval in milliseconds
    #[arg(
        env = "ECOGROW_STATE_INTERVAL_MS",
        long = "state-interval-ms",
        value_name = "ms",
        value_parser = parse_interval,
        default_value = "30000"
    )]
    pub state_interval: Duration,

    /// Command poll interval in milliseconds
    #[arg(
        env = "ECOGROW_COMMAND_INTERVAL_MS",
        long = "command-interval-ms",
        value_name = "ms",
        value_parser = parse_interval,
        default_value = "5000"
    )]
    pub command_interval: Duration,

    /// Executable run with each pump command as its argument
    #[arg(env = "ECOGROW_PUMP_HOOK", long = "pump-hook", value_name = "path")]
    pub pump_hook: Option<PathBuf>,

    /// Executable run with each light command as its argument
    #[arg(env = "ECOGROW_LIGHT_HOOK", long = "light-hook", value_name = "path")]
    pub light_hook: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
