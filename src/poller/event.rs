//! Change events produced by the detector.

use crate::source::SignalValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked signal as seen at the instant of a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub name: String,
    /// `None` until the signal has been read successfully once
    pub value: Option<SignalValue>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A detected signal transition.
///
/// Created by the change detector and handed to the dispatcher, which
/// consumes it exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Name of the signal that changed
    pub signal: String,
    /// New value
    pub value: SignalValue,
    /// Value before the change; `None` on first observation
    pub previous: Option<SignalValue>,
    /// When the new value was observed
    pub timestamp: DateTime<Utc>,
    /// All tracked signals, with this change already applied
    pub snapshot: Vec<SnapshotEntry>,
}

impl ChangeEvent {
    /// Whether this is the first value ever seen for the signal.
    pub fn is_initial(&self) -> bool {
        self.previous.is_none()
    }
}
