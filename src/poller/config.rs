//! Configuration for the register poller.

use serde::{Deserialize, Serialize};

/// Configuration for signal sampling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Milliseconds between poll ticks
    pub interval_ms: u64,
    /// Upper bound for a single signal read
    pub read_timeout_ms: u64,
    /// Change events buffered between the poller and the dispatcher
    pub event_queue_capacity: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            read_timeout_ms: 500,
            event_queue_capacity: 1024,
        }
    }
}
