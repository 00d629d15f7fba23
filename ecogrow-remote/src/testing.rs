use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::command::{Actuator, Actuators};
use crate::identity::DeviceIdentity;
use crate::store::{RemoteStore, StoreError};
use crate::util::types::DeviceId;

/// Store operation as seen by the [`MemoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetString(String, String),
    GetString(String),
    SetJson(String, Value),
    PushJson(String, Value),
}

#[derive(Default)]
struct Inner {
    values: HashMap<String, Value>,
    calls: Vec<Call>,
    fail_writes: bool,
    fail_reads: bool,
    pushed: usize,
}

/// In-memory store recording every call it receives.
///
/// Clones share the same contents so a test can keep a handle after
/// moving the store into a client.
#[derive(Clone, Default)]
pub struct MemoryStore(Arc<Mutex<Inner>>);

impl MemoryStore {
    pub fn fail_writes(&self, fail: bool) {
        self.0.lock().unwrap().fail_writes = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.0.lock().unwrap().fail_reads = fail;
    }

    pub fn insert(&self, path: &str, value: Value) {
        self.0.lock().unwrap().values.insert(path.to_owned(), value);
    }

    pub fn value(&self, path: &str) -> Option<Value> {
        self.0.lock().unwrap().values.get(path).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.0.lock().unwrap().calls.clear();
    }

    fn unavailable() -> StoreError {
        StoreError::Status(
            StatusCode::SERVICE_UNAVAILABLE,
            "store unavailable".to_owned(),
        )
    }

    fn write(&self, call: Call, path: &str, value: Value) -> Result<(), StoreError> {
        let mut inner = self.0.lock().unwrap();
        inner.calls.push(call);
        if inner.fail_writes {
            return Err(Self::unavailable());
        }
        inner.values.insert(path.to_owned(), value);
        Ok(())
    }
}

impl RemoteStore for MemoryStore {
    async fn set_string(&self, path: &str, value: &str) -> Result<(), StoreError> {
        self.write(
            Call::SetString(path.to_owned(), value.to_owned()),
            path,
            Value::String(value.to_owned()),
        )
    }

    async fn get_string(&self, path: &str) -> Result<String, StoreError> {
        let mut inner = self.0.lock().unwrap();
        inner.calls.push(Call::GetString(path.to_owned()));
        if inner.fail_reads {
            return Err(Self::unavailable());
        }
        let value = match inner.values.get(path) {
            Some(Value::String(value)) => value.clone(),
            Some(Value::Null) | None => String::new(),
            Some(document) => document.to_string(),
        };
        Ok(value)
    }

    async fn set_json<T: Serialize + Sync>(
        &self,
        path: &str,
        document: &T,
    ) -> Result<(), StoreError> {
        let document = serde_json::to_value(document)?;
        self.write(
            Call::SetJson(path.to_owned(), document.clone()),
            path,
            document,
        )
    }

    async fn push_json<T: Serialize + Sync>(
        &self,
        path: &str,
        document: &T,
    ) -> Result<String, StoreError> {
        let document = serde_json::to_value(document)?;
        let mut inner = self.0.lock().unwrap();
        inner
            .calls
            .push(Call::PushJson(path.to_owned(), document.clone()));
        if inner.fail_writes {
            return Err(Self::unavailable());
        }
        inner.pushed += 1;
        let key = format!("-N{:06}", inner.pushed);
        inner.values.insert(format!("{path}/{key}"), document);
        Ok(key)
    }
}

/// Actuators that only remember what they were told
#[derive(Debug, Default)]
pub struct RecordingActuators {
    pub commands: Vec<(Actuator, String)>,
}

impl Actuators for RecordingActuators {
    async fn actuate(&mut self, actuator: Actuator, command: &str) {
        self.commands.push((actuator, command.to_owned()));
    }
}

/// Fixed identity
pub struct StaticIdentity(pub DeviceId);

impl Default for StaticIdentity {
    fn default() -> Self {
        Self(DeviceId::from("1193046"))
    }
}

impl DeviceIdentity for StaticIdentity {
    fn device_id(&self) -> DeviceId {
        self.0.clone()
    }

    fn ip_address(&self) -> String {
        "192.168.1.20".to_owned()
    }

    fn mac_address(&self) -> String {
        "5C:CF:7F:12:34:56".to_owned()
    }
}
