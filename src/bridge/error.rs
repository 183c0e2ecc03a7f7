//! Startup error types

use crate::poller::SignalSetError;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons the bridge could not start. Nothing is left running when one of
/// these is returned.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("bridge is already running")]
    AlreadyRunning,

    #[error("invalid signal set: {0}")]
    SignalSet(#[from] SignalSetError),

    #[error("invalid push path '{path}': {reason}")]
    PushPath { path: String, reason: &'static str },

    #[error("failed to prepare asset root {}: {source}", .path.display())]
    AssetRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
