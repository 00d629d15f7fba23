use serde_json::{Map, Value};
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, instrument, warn};

/// Device outputs that can be driven by remote commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actuator {
    Pump,
    Light,
}

impl Actuator {
    /// Recognized actuators, in dispatch order
    pub const ALL: [Actuator; 2] = [Actuator::Pump, Actuator::Light];

    /// Key of this actuator in a command document
    pub fn key(&self) -> &'static str {
        match self {
            Actuator::Pump => "pump",
            Actuator::Light => "light",
        }
    }
}

impl Display for Actuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Receiver of commands extracted from command documents
pub trait Actuators {
    fn actuate(&mut self, actuator: Actuator, command: &str) -> impl Future<Output = ()> + Send;
}

/// Parse a command document and dispatch every recognized command.
///
/// Malformed documents are logged and dropped. Unknown keys are ignored.
/// String values are handed over as-is, any other value as its JSON text.
#[instrument(skip_all)]
pub async fn process_command<A: Actuators>(document: &str, actuators: &mut A) {
    debug!("processing command: {document}");

    let commands: Map<String, Value> = match serde_json::from_str(document) {
        Ok(commands) => commands,
        Err(err) => {
            warn!("failed to parse command document: {err}");
            return;
        }
    };

    for actuator in Actuator::ALL {
        let command = match commands.get(actuator.key()) {
            Some(Value::String(command)) => command.clone(),
            Some(value) => value.to_string(),
            None => continue,
        };
        actuators.actuate(actuator, &command).await;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::testing::RecordingActuators;

    use super::*;

    #[tokio::test]
    async fn it_dispatches_recognized_commands_in_order() {
        let mut actuators = RecordingActuators::default();
        process_command(r#"{"light": "off", "pump": "on"}"#, &mut actuators).await;

        assert_eq!(
            actuators.commands,
            vec![
                (Actuator::Pump, "on".to_owned()),
                (Actuator::Light, "off".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn it_ignores_unknown_keys() {
        let mut actuators = RecordingActuators::default();
        process_command(r#"{"fan": "on", "pump": "off"}"#, &mut actuators).await;

        assert_eq!(actuators.commands, vec![(Actuator::Pump, "off".to_owned())]);
    }

    #[tokio::test]
    async fn it_passes_non_string_values_as_json_text() {
        let mut actuators = RecordingActuators::default();
        process_command(r#"{"pump": 1, "light": true}"#, &mut actuators).await;

        assert_eq!(
            actuators.commands,
            vec![
                (Actuator::Pump, "1".to_owned()),
                (Actuator::Light, "true".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn it_drops_malformed_documents() {
        let mut actuators = RecordingActuators::default();
        process_command(r#"{"pump": "o"#, &mut actuators).await;
        process_command(r#"["pump", "on"]"#, &mut actuators).await;

        assert!(actuators.commands.is_empty());
    }
}
