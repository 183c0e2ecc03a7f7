//! Signals command implementation

use crate::cli::output::{format_signals_json, format_signals_table, SignalView};
use crate::cli::SignalsArgs;
use crate::config::BridgeConfig;
use crate::poller::RegisterPoller;
use crate::source::{create_source, SignalSource};
use std::time::Duration;

/// Load the configuration named by `args`, falling back to defaults when
/// the file does not exist.
fn load_config(args: &SignalsArgs) -> Result<BridgeConfig, Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        BridgeConfig::load(Some(&args.config))?
    } else {
        BridgeConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Read every signal once, filling in values or errors.
pub async fn read_all(
    source: &dyn SignalSource,
    views: &mut [SignalView],
    config: &BridgeConfig,
) {
    let timeout = Duration::from_millis(config.poller.read_timeout_ms);
    for (view, spec) in views.iter_mut().zip(&config.signals) {
        match RegisterPoller::read_signal(source, spec, timeout).await {
            Ok(value) => view.value = Some(value),
            Err(e) => view.error = Some(e.to_string()),
        }
    }
}

/// Handle signals command
pub async fn handle_signals(args: &SignalsArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let mut views: Vec<SignalView> = config.signals.iter().map(SignalView::from).collect();

    if args.read {
        let source = create_source(&config.source)?;
        read_all(source.as_ref(), &mut views, &config).await;
    }

    if args.json {
        Ok(format_signals_json(&views)?)
    } else {
        Ok(format_signals_table(&views, args.read))
    }
}
