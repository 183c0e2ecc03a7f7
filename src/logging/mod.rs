//! Structured logging helpers
//!
//! The subscriber itself is installed by the CLI; this module only turns the
//! `[logging]` section into `EnvFilter` directives.

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level
/// and any component-specific log levels configured in the LoggingConfig.
/// Components are sorted so the output is stable.
///
/// # Examples
///
/// ```
/// use telemetry_bridge::config::logging::{LogFormat, LoggingConfig};
/// use telemetry_bridge::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let mut component_levels = HashMap::new();
/// component_levels.insert("poller".to_string(), "debug".to_string());
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Pretty,
///     component_levels: Some(component_levels),
/// };
///
/// let filter_str = build_filter_directives(&config);
/// assert_eq!(filter_str, "info,telemetry_bridge::poller=debug");
/// ```
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",telemetry_bridge::{}={}", component, level));
        }
    }

    filter_str
}
