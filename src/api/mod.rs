//! # HTTP Surface
//!
//! One listener serves two things:
//!
//! - `GET <ws_path>` (default `/ws`) - WebSocket push channel
//! - `GET <anything else>` - static asset lookup under the asset root
//!
//! ## Example
//!
//! ```no_run
//! use telemetry_bridge::api::{create_router, AppState};
//! use telemetry_bridge::assets::AssetServer;
//! use telemetry_bridge::config::BridgeConfig;
//! use telemetry_bridge::connections::ConnectionRegistry;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(BridgeConfig::default());
//! let assets = AssetServer::new("htmlPages", "index.html")?;
//! let state = Arc::new(AppState::new(
//!     config,
//!     assets,
//!     Arc::new(ConnectionRegistry::new()),
//!     CancellationToken::new(),
//! ));
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod websocket;

use crate::assets::{handler::asset_handler, AssetServer};
use crate::config::BridgeConfig;
use crate::connections::ConnectionRegistry;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<BridgeConfig>,
    pub assets: AssetServer,
    pub connections: Arc<ConnectionRegistry>,
    /// Cancelled when the bridge stops
    pub shutdown: CancellationToken,
    /// Tracks per-connection socket tasks so stop can wait for them
    pub tasks: TaskTracker,
}

impl AppState {
    pub fn new(
        config: Arc<BridgeConfig>,
        assets: AssetServer,
        connections: Arc<ConnectionRegistry>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            assets,
            connections,
            shutdown,
            tasks: TaskTracker::new(),
        }
    }
}

/// Create the router: the push endpoint plus the asset fallback.
pub fn create_router(state: Arc<AppState>) -> Router {
    let ws_path = state.config.server.ws_path.clone();

    Router::new()
        .route(&ws_path, get(websocket::websocket_handler))
        .fallback(asset_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
