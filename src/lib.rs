//! Telemetry bridge - live PLC signal dashboard server
//!
//! Serves a browser dashboard from a local directory and pushes signal
//! changes to every connected browser over WebSocket.
//!
//! Data flows one way:
//!
//! ```text
//! SignalSource -> RegisterPoller -> ChangeDetector -> Dispatcher -> ConnectionRegistry -> browsers
//! ```
//!
//! [`bridge::Bridge`] starts and stops all of it as one unit.

pub mod api;
pub mod assets;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod connections;
pub mod dispatch;
pub mod logging;
pub mod poller;
pub mod source;
