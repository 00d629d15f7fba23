use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::remote::{Actuator, Actuators};

/// Actuators driven by external executables.
///
/// Each command is passed to the actuator's hook as its only argument.
/// Actuators without a hook just log what they receive.
#[derive(Clone, Debug, Default)]
pub struct HookActuators {
    pump: Option<PathBuf>,
    light: Option<PathBuf>,
}

impl HookActuators {
    pub fn new(pump: Option<PathBuf>, light: Option<PathBuf>) -> Self {
        Self { pump, light }
    }

    fn hook(&self, actuator: Actuator) -> Option<&Path> {
        match actuator {
            Actuator::Pump => self.pump.as_deref(),
            Actuator::Light => self.light.as_deref(),
        }
    }
}

async fn run_hook(hook: &Path, command: &str) -> io::Result<ExitStatus> {
    Command::new(hook)
        .arg(command)
        .kill_on_drop(true)
        .status()
        .await
}

impl Actuators for HookActuators {
    async fn actuate(&mut self, actuator: Actuator, command: &str) {
        let Some(hook) = self.hook(actuator) else {
            info!("{actuator} command: {command}");
            return;
        };

        match run_hook(hook, command).await {
            Ok(status) if status.success() => debug!("{actuator} set to {command}"),
            Ok(status) => warn!("{actuator} hook {} exited with {status}", hook.display()),
            Err(err) => error!("failed to run {actuator} hook {}: {err}", hook.display()),
        }
    }
}
