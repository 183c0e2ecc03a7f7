//! Event dispatch configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// `type` field of every pushed envelope
    pub event_type: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            event_type: "torque_update".to_string(),
        }
    }
}
