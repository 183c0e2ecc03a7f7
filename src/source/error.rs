//! Error types for signal sources.

use super::types::SignalType;
use thiserror::Error;

/// Errors that can occur while reading a signal.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Read did not complete in time
    #[error("read timed out after {0}ms")]
    Timeout(u64),

    /// Source could not be reached
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// Source answered with a non-success HTTP status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Source answered but the value could not be decoded
    #[error("malformed value: {0}")]
    Malformed(String),

    /// Source does not know the address
    #[error("unknown address: {0}")]
    UnknownAddress(String),

    /// Value type does not match the declared signal type
    #[error("type mismatch for '{signal}': expected {expected}, got {actual}")]
    TypeMismatch {
        signal: String,
        expected: SignalType,
        actual: SignalType,
    },
}
