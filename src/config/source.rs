//! Signal source configuration

use serde::{Deserialize, Serialize};

fn default_http_timeout_ms() -> u64 {
    1000
}

/// Which [`SignalSource`](crate::source::SignalSource) the bridge reads from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Generated readings; a fixed seed makes runs repeatable
    Simulator {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Register gateway reached over HTTP
    Http {
        url: String,
        #[serde(default = "default_http_timeout_ms")]
        timeout_ms: u64,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Simulator { seed: None }
    }
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Simulator { .. } => "simulator",
            SourceConfig::Http { .. } => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        source: SourceConfig,
    }

    #[test]
    fn test_parse_simulator() {
        let parsed: Wrapper = toml::from_str("[source]\nkind = \"simulator\"\nseed = 7").unwrap();
        assert_eq!(parsed.source, SourceConfig::Simulator { seed: Some(7) });
    }

    #[test]
    fn test_parse_http_with_default_timeout() {
        let parsed: Wrapper =
            toml::from_str("[source]\nkind = \"http\"\nurl = \"http://10.0.0.5:8000\"").unwrap();
        assert_eq!(
            parsed.source,
            SourceConfig::Http {
                url: "http://10.0.0.5:8000".to_string(),
                timeout_ms: 1000,
            }
        );
        assert_eq!(parsed.source.kind(), "http");
    }

    #[test]
    fn test_parse_unknown_kind_fails() {
        assert!(toml::from_str::<Wrapper>("[source]\nkind = \"modbus\"").is_err());
    }
}
