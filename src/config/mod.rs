//! Configuration module for the telemetry bridge
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`BRIDGE_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use telemetry_bridge::config::BridgeConfig;
//!
//! let config = BridgeConfig::default();
//! assert_eq!(config.server.port, 8080);
//!
//! let toml = r#"
//! [server]
//! port = 9000
//! "#;
//! let config: BridgeConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.port, 9000);
//! assert_eq!(config.signals.len(), 4);
//! ```

pub mod assets;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod server;
pub mod source;

pub use assets::AssetsConfig;
pub use dispatch::DispatchConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use source::SourceConfig;

// Re-export PollerConfig from poller module
pub use crate::poller::PollerConfig;

use crate::poller::validate_signal_set;
use crate::source::{default_signals, SignalSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// HTTP listener and push endpoint
    pub server: ServerConfig,
    /// Static dashboard pages
    pub assets: AssetsConfig,
    /// Signal sampling
    pub poller: PollerConfig,
    /// Push envelope settings
    pub dispatch: DispatchConfig,
    /// Where signal values come from
    pub source: SourceConfig,
    /// Tracked signal set
    pub signals: Vec<SignalSpec>,
    pub logging: LoggingConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            assets: AssetsConfig::default(),
            poller: PollerConfig::default(),
            dispatch: DispatchConfig::default(),
            source: SourceConfig::default(),
            signals: default_signals(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports BRIDGE_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("BRIDGE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(host) = std::env::var("BRIDGE_HOST") {
            self.server.host = host;
        }
        if let Ok(root) = std::env::var("BRIDGE_ASSET_ROOT") {
            if !root.is_empty() {
                self.assets.root = root.into();
            }
        }
        if let Ok(interval) = std::env::var("BRIDGE_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.poller.interval_ms = ms;
            }
        }

        if let Ok(level) = std::env::var("BRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BRIDGE_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "port must be non-zero",
            ));
        }
        self.server
            .check_ws_path()
            .map_err(|message| ConfigError::validation("server.ws_path", message))?;
        if self.server.outbound_queue_capacity == 0 {
            return Err(ConfigError::validation(
                "server.outbound_queue_capacity",
                "capacity must be non-zero",
            ));
        }

        let document = &self.assets.default_document;
        if document.is_empty() || document.split(['/', '\\']).any(|s| s == "..") {
            return Err(ConfigError::validation(
                "assets.default_document",
                "must be a non-empty path inside the asset root",
            ));
        }

        if self.poller.interval_ms == 0 {
            return Err(ConfigError::validation(
                "poller.interval_ms",
                "interval must be non-zero",
            ));
        }
        if self.poller.read_timeout_ms == 0 {
            return Err(ConfigError::validation(
                "poller.read_timeout_ms",
                "timeout must be non-zero",
            ));
        }
        if self.poller.event_queue_capacity == 0 {
            return Err(ConfigError::validation(
                "poller.event_queue_capacity",
                "capacity must be non-zero",
            ));
        }

        if let SourceConfig::Http { url, .. } = &self.source {
            if url.trim().is_empty() {
                return Err(ConfigError::validation("source.url", "URL cannot be empty"));
            }
        }

        validate_signal_set(&self.signals)
            .map_err(|e| ConfigError::validation("signals", e.to_string()))?;

        Ok(())
    }
}
