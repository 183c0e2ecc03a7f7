//! Signal sources - the read-only seam between the bridge and the device.
//!
//! The poller never talks to hardware directly. Everything it samples goes
//! through [`SignalSource`], which has two implementations:
//!
//! - [`HttpSource`] - reads registers from a gateway that fronts the PLC
//! - [`Simulator`] - generates plausible torque station readings

pub mod error;
pub mod http;
pub mod simulator;
pub mod types;

pub use error::SourceError;
pub use http::HttpSource;
pub use simulator::Simulator;
pub use types::{default_signals, SignalSpec, SignalType, SignalValue};

use crate::config::SourceConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Read interface over the external data source.
///
/// Implementations must be cheap to call repeatedly; the poller invokes
/// [`read`](SignalSource::read) once per signal per tick and bounds each
/// call with its own timeout, so a read never needs its own deadline.
///
/// # Object Safety
///
/// This trait is object-safe and used as `Arc<dyn SignalSource>`.
#[async_trait]
pub trait SignalSource: Send + Sync + 'static {
    /// Human-readable name for logging (e.g. "simulator").
    fn name(&self) -> &str;

    /// Read the current raw value of one signal.
    ///
    /// The returned value is checked against `signal.signal_type` by the caller.
    async fn read(&self, signal: &SignalSpec) -> Result<SignalValue, SourceError>;
}

/// Build the source described by the `[source]` configuration section.
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn SignalSource>, SourceError> {
    match config {
        SourceConfig::Simulator { seed } => {
            tracing::info!(seed = ?seed, "Using simulated signal source");
            Ok(Arc::new(Simulator::new(*seed)))
        }
        SourceConfig::Http { url, timeout_ms } => {
            tracing::info!(url = %url, "Using HTTP register gateway source");
            let source = HttpSource::new(url.clone(), Duration::from_millis(*timeout_ms))?;
            Ok(Arc::new(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_simulator_source() {
        let source = create_source(&SourceConfig::Simulator { seed: Some(1) }).unwrap();
        assert_eq!(source.name(), "simulator");
    }

    #[test]
    fn test_create_http_source() {
        let source = create_source(&SourceConfig::Http {
            url: "http://127.0.0.1:9000".to_string(),
            timeout_ms: 250,
        })
        .unwrap();
        assert_eq!(source.name(), "http");
    }
}
