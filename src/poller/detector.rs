//! Per-signal state tracking and change detection.
//!
//! Changes are derived by diffing consecutive samples. A source cannot
//! report a change on its own; it only answers reads.

use super::error::SignalSetError;
use super::event::{ChangeEvent, SnapshotEntry};
use crate::source::{SignalSpec, SignalValue};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Tracks the last known state of a single signal.
#[derive(Debug, Clone)]
pub struct TrackedSignal {
    pub spec: SignalSpec,
    /// Last value that was reported as a change
    pub value: Option<SignalValue>,
    /// When the signal was last read successfully
    pub updated_at: Option<DateTime<Utc>>,
}

impl TrackedSignal {
    fn new(spec: SignalSpec) -> Self {
        Self {
            spec,
            value: None,
            updated_at: None,
        }
    }

    /// Apply a fresh reading. Returns the previous value (or `None` for the
    /// first observation) when the reading counts as a change.
    ///
    /// Timestamps never move backwards, even if the wall clock does.
    fn apply(&mut self, value: SignalValue, now: DateTime<Utc>) -> Option<Option<SignalValue>> {
        let timestamp = match self.updated_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.updated_at = Some(timestamp);

        match self.value {
            None => {
                self.value = Some(value);
                Some(None)
            }
            Some(previous) if value.differs_from(&previous, self.spec.deadband()) => {
                self.value = Some(value);
                Some(Some(previous))
            }
            Some(_) => None,
        }
    }
}

/// Check that a signal set can be tracked.
pub fn validate_signal_set(specs: &[SignalSpec]) -> Result<(), SignalSetError> {
    if specs.is_empty() {
        return Err(SignalSetError::Empty);
    }
    let mut seen = HashSet::with_capacity(specs.len());
    for spec in specs {
        if spec.name.trim().is_empty() {
            return Err(SignalSetError::EmptyName);
        }
        if spec.address.trim().is_empty() {
            return Err(SignalSetError::EmptyAddress(spec.name.clone()));
        }
        if spec.deadband.is_some_and(|d| d < 0.0 || d.is_nan()) {
            return Err(SignalSetError::NegativeDeadband(spec.name.clone()));
        }
        if !seen.insert(spec.name.as_str()) {
            return Err(SignalSetError::DuplicateName(spec.name.clone()));
        }
    }
    Ok(())
}

/// Compares each reading with the last known value of its signal.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    signals: Vec<TrackedSignal>,
    index: HashMap<String, usize>,
}

impl ChangeDetector {
    /// Create a detector for a fixed signal set.
    pub fn new(specs: Vec<SignalSpec>) -> Result<Self, SignalSetError> {
        validate_signal_set(&specs)?;
        let index = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name.clone(), i))
            .collect();
        let signals = specs.into_iter().map(TrackedSignal::new).collect();
        Ok(Self { signals, index })
    }

    /// Record a reading for `name`, returning an event if it is a change.
    ///
    /// Readings for unknown names are ignored.
    pub fn observe(
        &mut self,
        name: &str,
        value: SignalValue,
        now: DateTime<Utc>,
    ) -> Option<ChangeEvent> {
        let idx = *self.index.get(name)?;
        let signal = &mut self.signals[idx];
        let previous = signal.apply(value, now)?;
        let timestamp = signal.updated_at.unwrap_or(now);

        Some(ChangeEvent {
            signal: name.to_string(),
            value,
            previous,
            timestamp,
            snapshot: self.snapshot(),
        })
    }

    /// Current state of every tracked signal, in declaration order.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.signals
            .iter()
            .map(|s| SnapshotEntry {
                name: s.spec.name.clone(),
                value: s.value,
                updated_at: s.updated_at,
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&TrackedSignal> {
        self.index.get(name).map(|&i| &self.signals[i])
    }

    pub fn specs(&self) -> impl Iterator<Item = &SignalSpec> {
        self.signals.iter().map(|s| &s.spec)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}
