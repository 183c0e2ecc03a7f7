//! Signal definitions and values shared by sources, the poller, and the wire payload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type tag of a tracked signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Float,
    Int,
    Bool,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::Float => write!(f, "float"),
            SignalType::Int => write!(f, "int"),
            SignalType::Bool => write!(f, "bool"),
        }
    }
}

/// A scalar value read from a signal source.
///
/// Serialized untagged, so it appears on the wire as a plain JSON
/// number or boolean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl SignalValue {
    /// Type tag of this value.
    pub fn signal_type(&self) -> SignalType {
        match self {
            SignalValue::Bool(_) => SignalType::Bool,
            SignalValue::Int(_) => SignalType::Int,
            SignalValue::Float(_) => SignalType::Float,
        }
    }

    /// Coerce the value to the declared type of a signal.
    ///
    /// Integers widen to floats; every other mismatch returns `None`.
    pub fn conform(self, expected: SignalType) -> Option<SignalValue> {
        match (self, expected) {
            (SignalValue::Int(i), SignalType::Float) => Some(SignalValue::Float(i as f64)),
            (value, expected) if value.signal_type() == expected => Some(value),
            _ => None,
        }
    }

    /// Whether `self` counts as a change relative to `previous`.
    ///
    /// Float pairs differ only when they are further apart than `deadband`;
    /// a zero deadband means any difference.
    pub fn differs_from(&self, previous: &SignalValue, deadband: f64) -> bool {
        match (self, previous) {
            (SignalValue::Float(a), SignalValue::Float(b)) if deadband > 0.0 => {
                (a - b).abs() > deadband
            }
            (a, b) => a != b,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SignalValue::Float(f) => Some(*f),
            SignalValue::Int(i) => Some(*i as f64),
            SignalValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Bool(b) => write!(f, "{}", b),
            SignalValue::Int(i) => write!(f, "{}", i),
            SignalValue::Float(v) => write!(f, "{:.2}", v),
        }
    }
}

/// Definition of one tracked signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSpec {
    /// Unique name within the tracked set
    pub name: String,
    /// Address of the value in the source (e.g. a PLC register like "D100")
    pub address: String,
    /// Declared value type
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    /// Minimum float movement that counts as a change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadband: Option<f64>,
}

impl SignalSpec {
    pub fn new(name: impl Into<String>, address: impl Into<String>, signal_type: SignalType) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            signal_type,
            deadband: None,
        }
    }

    pub fn with_deadband(mut self, deadband: f64) -> Self {
        self.deadband = Some(deadband);
        self
    }

    pub fn deadband(&self) -> f64 {
        self.deadband.unwrap_or(0.0)
    }
}

/// The torque station signal set tracked when no `[[signals]]` are configured.
pub fn default_signals() -> Vec<SignalSpec> {
    vec![
        SignalSpec::new("TorqueValue", "D100", SignalType::Float),
        SignalSpec::new("TorqueStatus", "M100", SignalType::Bool),
        SignalSpec::new("MotorSpeed", "D101", SignalType::Int),
        SignalSpec::new("SystemStatus", "D102", SignalType::Int),
    ]
}
