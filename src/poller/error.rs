//! Error types for the tracked signal set.

use thiserror::Error;

/// Reasons a signal set cannot be tracked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalSetError {
    #[error("signal set is empty")]
    Empty,

    #[error("duplicate signal name: {0}")]
    DuplicateName(String),

    #[error("signal name cannot be empty")]
    EmptyName,

    #[error("signal '{0}' has an empty address")]
    EmptyAddress(String),

    #[error("signal '{0}' has a negative deadband")]
    NegativeDeadband(String),
}
