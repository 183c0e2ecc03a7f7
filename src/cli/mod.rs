//! CLI module for the telemetry bridge
//!
//! # Commands
//!
//! - `serve` - Run the bridge until interrupted
//! - `signals` - Show the configured signal set, optionally reading it once
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Serve the dashboard on another port
//! telemetry-bridge serve --port 9090
//!
//! # Read every signal once from the configured source
//! telemetry-bridge signals --read
//!
//! # Generate shell completions
//! telemetry-bridge completions bash > ~/.bash_completion.d/telemetry-bridge
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod serve;
pub mod signals;

pub use completions::handle_completions;
pub use config::handle_config_init;
pub use signals::handle_signals;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Local telemetry bridge for PLC torque stations
#[derive(Parser, Debug)]
#[command(
    name = "telemetry-bridge",
    version,
    about = "Serves a live dashboard and pushes PLC signal changes over WebSocket"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bridge
    Serve(ServeArgs),
    /// Show the configured signal set
    Signals(SignalsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "bridge.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "BRIDGE_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "BRIDGE_HOST")]
    pub host: Option<String>,

    /// Override the asset root directory
    #[arg(short, long, env = "BRIDGE_ASSET_ROOT")]
    pub assets: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BRIDGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Override the poll interval in milliseconds
    #[arg(short, long, env = "BRIDGE_POLL_INTERVAL_MS")]
    pub interval_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SignalsArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "bridge.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Read every signal once from the configured source
    #[arg(short, long)]
    pub read: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "bridge.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
