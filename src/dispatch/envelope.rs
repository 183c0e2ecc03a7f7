//! Wire format of the push channel.

use crate::poller::{ChangeEvent, SnapshotEntry};
use crate::source::SignalValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message sent to push clients.
///
/// `data` is itself a JSON document serialized to a string, so clients
/// decode twice: once for the envelope, once for the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type (e.g. "torque_update")
    #[serde(rename = "type")]
    pub message_type: String,
    /// Serialized payload
    pub data: String,
}

impl Envelope {
    pub fn new(message_type: impl Into<String>, data: String) -> Self {
        Self {
            message_type: message_type.into(),
            data,
        }
    }
}

/// Composite telemetry update carried in [`Envelope::data`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPayload {
    /// Signal that triggered this update
    pub changed: String,
    pub value: SignalValue,
    pub previous: Option<SignalValue>,
    pub timestamp: DateTime<Utc>,
    /// Milliseconds since the Unix epoch, for script clients
    pub timestamp_ms: i64,
    pub signals: Vec<SnapshotEntry>,
}

impl From<&ChangeEvent> for TelemetryPayload {
    fn from(event: &ChangeEvent) -> Self {
        Self {
            changed: event.signal.clone(),
            value: event.value,
            previous: event.previous,
            timestamp: event.timestamp,
            timestamp_ms: event.timestamp.timestamp_millis(),
            signals: event.snapshot.clone(),
        }
    }
}

/// Control commands a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    StartTest,
    StopTest,
    ResetTest,
}

/// Messages accepted from push clients.
///
/// Commands are reserved protocol surface: they are parsed and logged, but
/// no server-side action is bound to them yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Command { command: Command },
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
