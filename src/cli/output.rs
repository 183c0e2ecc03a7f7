//! Output formatting helpers for CLI commands

use crate::source::{SignalSpec, SignalType, SignalValue};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for signal display
#[derive(Debug, Clone, serde::Serialize)]
pub struct SignalView {
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadband: Option<f64>,
    /// Value from a one-off read, if one was requested and succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SignalValue>,
    /// Read error, if one was requested and failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&SignalSpec> for SignalView {
    fn from(spec: &SignalSpec) -> Self {
        Self {
            name: spec.name.clone(),
            address: spec.address.clone(),
            signal_type: spec.signal_type,
            deadband: spec.deadband,
            value: None,
            error: None,
        }
    }
}

/// Format signals as a table. The value column is shown only after a read.
pub fn format_signals_table(signals: &[SignalView], with_values: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec!["Name", "Address", "Type", "Deadband"];
    if with_values {
        header.push("Value");
    }
    table.set_header(header);

    for s in signals {
        let mut row = vec![
            Cell::new(&s.name),
            Cell::new(&s.address),
            Cell::new(s.signal_type),
            Cell::new(s.deadband.map_or_else(|| "-".to_string(), |d| d.to_string())),
        ];
        if with_values {
            let value = match (&s.value, &s.error) {
                (Some(v), _) => v.to_string().green().to_string(),
                (None, Some(e)) => e.red().to_string(),
                (None, None) => "-".yellow().to_string(),
            };
            row.push(Cell::new(value));
        }
        table.add_row(row);
    }

    table.to_string()
}

/// Format signals as JSON
pub fn format_signals_json(signals: &[SignalView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({ "signals": signals }))
}
