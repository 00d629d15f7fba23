use std::error::Error;

use tracing::{info, instrument, trace};
use tracing_subscriber::{
    EnvFilter,
    filter::ParseError,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

mod actuators;
mod cli;
mod config;
mod sync;

use ecogrow_remote as remote;
use ecogrow_util as util;

use crate::actuators::HookActuators;
use crate::remote::{RemoteConfig, RemoteSyncClient, RtdbStore, SystemIdentity};
use crate::sync::{Schedule, start_sync};

/// Log defaults, overriden by RUST_LOG when set
fn default_filter() -> Result<EnvFilter, ParseError> {
    Ok(EnvFilter::default()
        .add_directive("debug".parse()?)
        .add_directive("hyper=error".parse()?)
        .add_directive("hyper_util=error".parse()?)
        .add_directive("reqwest=info".parse()?))
}

fn initialize_tracing() -> Result<(), Box<dyn Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter()?,
    };

    // Initialize tracing subscriber for human-readable logs
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE)
                .event_format(fmt::format().compact().with_target(false)),
        )
        .try_init()?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    initialize_tracing()?;

    let cli = cli::parse();
    let remote_config = config::resolve(&cli).await?;

    let schedule = Schedule {
        state_file: cli.state_file.clone(),
        state_interval: cli.state_interval,
        command_interval: cli.command_interval,
    };
    let identity = SystemIdentity::new(cli.device_id.clone());
    let actuators = HookActuators::new(cli.pump_hook.clone(), cli.light_hook.clone());

    start_agent(remote_config, schedule, identity, actuators).await
}

#[instrument(name = "ecogrow", skip_all, err)]
async fn start_agent(
    remote_config: RemoteConfig,
    schedule: Schedule,
    identity: SystemIdentity,
    actuators: HookActuators,
) -> Result<(), Box<dyn Error>> {
    trace!(
        remote = ?remote_config,
        schedule = ?schedule,
        actuators = ?actuators,
        "using config:"
    );

    let store = RtdbStore::new(&remote_config)?;
    let client = RemoteSyncClient::new(remote_config, store, actuators, identity);

    // Run until interrupted, a blocked store call is abandoned on shutdown
    tokio::select! {
        _ = start_sync(client, schedule) => Ok(()),
        res = tokio::signal::ctrl_c() => {
            info!("shutting down");
            res.map_err(|err| err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_the_default_log_filter() {
        let filter = default_filter().unwrap().to_string();
        assert!(filter.contains("hyper=error"));
        assert!(filter.contains("reqwest=info"));
    }
}
