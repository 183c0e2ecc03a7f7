//! Server configuration

use serde::{Deserialize, Serialize};

/// HTTP listener and push channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path of the WebSocket push endpoint
    pub ws_path: String,
    /// Messages buffered per push connection before it is disconnected
    pub outbound_queue_capacity: usize,
    /// Upper bound on waiting for tasks during stop
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ws_path: "/ws".to_string(),
            outbound_queue_capacity: 64,
            shutdown_timeout_seconds: 5,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check that `ws_path` is a literal route that leaves `/` to the assets.
    pub fn check_ws_path(&self) -> Result<(), &'static str> {
        check_ws_path(&self.ws_path)
    }
}

/// Push paths must be literal: the router treats `:name`, `*rest` and
/// braces as captures and refuses malformed ones at startup.
pub fn check_ws_path(path: &str) -> Result<(), &'static str> {
    if !path.starts_with('/') {
        return Err("push path must start with '/'");
    }
    if path == "/" {
        return Err("push path cannot be '/', it serves the default document");
    }
    if path.contains(['{', '}']) {
        return Err("push path cannot contain '{' or '}'");
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err("push path segments cannot start with ':' or '*'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.ws_path, "/ws");
        assert_eq!(config.outbound_queue_capacity, 64);
        assert_eq!(config.shutdown_timeout_seconds, 5);
    }

    #[test]
    fn test_bind_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_check_ws_path() {
        assert!(check_ws_path("/ws").is_ok());
        assert!(check_ws_path("/api/v1/push").is_ok());

        for path in ["ws", "", "/", "/ws/*", "/ws/:", "/ws/:id", "/*rest", "/ws/{id}", "/ws}"] {
            assert!(check_ws_path(path).is_err(), "{} should be rejected", path);
        }
    }
}
