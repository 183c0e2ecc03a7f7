//! Lifecycle Controller
//!
//! [`Bridge`] owns the listener, the poll loop and the dispatcher and starts
//! and stops them as one unit. All of them observe a single shutdown
//! [`CancellationToken`]; a fresh token is created on every start so a
//! stopped bridge can be started again.
//!
//! # Metrics
//!
//! Counters and histograms go through the [`metrics`] facade and are no-ops
//! until the embedding application installs a recorder (for example
//! `metrics-exporter-prometheus`). The `serve` command installs none.
//!
//! | name | kind |
//! |------|------|
//! | `bridge_poll_ticks_total` | counter |
//! | `bridge_poll_tick_seconds` | histogram |
//! | `bridge_change_events_total` | counter |
//! | `bridge_source_read_failures_total` | counter, labelled by `signal` |
//! | `bridge_messages_delivered_total` | counter |
//! | `bridge_connections_pruned_total` | counter |
//! | `bridge_connections_opened_total` | counter |

mod error;

pub use error::StartupError;

use crate::api::{create_router, AppState};
use crate::assets::{prepare_root, AssetServer};
use crate::config::BridgeConfig;
use crate::connections::ConnectionRegistry;
use crate::dispatch::Dispatcher;
use crate::poller::RegisterPoller;
use crate::source::SignalSource;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Everything spawned by one successful start.
struct Running {
    shutdown: CancellationToken,
    local_addr: SocketAddr,
    /// Per-connection socket tasks
    sockets: TaskTracker,
    server: JoinHandle<()>,
    poller: JoinHandle<()>,
    dispatcher: JoinHandle<()>,
}

/// The telemetry bridge.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use telemetry_bridge::bridge::Bridge;
/// use telemetry_bridge::config::BridgeConfig;
/// use telemetry_bridge::source::Simulator;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bridge = Bridge::new(BridgeConfig::default(), Arc::new(Simulator::new(Some(42))));
/// let addr = bridge.start().await?;
/// println!("dashboard at http://{}/", addr);
///
/// bridge.stop().await;
/// bridge.stop().await; // no-op
/// # Ok(())
/// # }
/// ```
pub struct Bridge {
    config: Arc<BridgeConfig>,
    source: Arc<dyn SignalSource>,
    connections: Arc<ConnectionRegistry>,
    running: Mutex<Option<Running>>,
}

impl Bridge {
    pub fn new(config: BridgeConfig, source: Arc<dyn SignalSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
            connections: Arc::new(ConnectionRegistry::new()),
            running: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Live push connections.
    pub fn connections(&self) -> &Arc<ConnectionRegistry> {
        &self.connections
    }

    /// Address the listener is bound to, while running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.local_addr)
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Validate, bind, and spawn the server, poller and dispatcher.
    ///
    /// Returns the bound address (useful with port 0).
    ///
    /// # Errors
    ///
    /// Fails without leaving anything running if the bridge is already
    /// running, the signal set or push path is invalid, the asset root
    /// cannot be prepared, or the listener cannot be bound.
    pub async fn start(&self) -> Result<SocketAddr, StartupError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(StartupError::AlreadyRunning);
        }

        let (events_tx, events_rx) = mpsc::channel(self.config.poller.event_queue_capacity.max(1));
        let poller = RegisterPoller::new(
            Arc::clone(&self.source),
            self.config.signals.clone(),
            self.config.poller.clone(),
            events_tx,
        )?;

        self.config
            .server
            .check_ws_path()
            .map_err(|reason| StartupError::PushPath {
                path: self.config.server.ws_path.clone(),
                reason,
            })?;

        let assets_config = &self.config.assets;
        let asset_root_error = |source| StartupError::AssetRoot {
            path: assets_config.root.clone(),
            source,
        };
        prepare_root(&assets_config.root, assets_config.bootstrap).map_err(asset_root_error)?;
        let assets = AssetServer::new(&assets_config.root, assets_config.default_document.clone())
            .map_err(asset_root_error)?;

        let shutdown = CancellationToken::new();
        let state = Arc::new(AppState::new(
            Arc::clone(&self.config),
            assets,
            Arc::clone(&self.connections),
            shutdown.clone(),
        ));
        let sockets = state.tasks.clone();
        let app = create_router(state);

        let addr = self.config.server.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| StartupError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| StartupError::Bind { addr, source })?;

        // Nothing below can fail.
        let server_token = shutdown.clone();
        let server = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move { server_token.cancelled().await })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
            }
        });

        let poller = poller.start(shutdown.clone());
        let dispatcher = Dispatcher::new(
            Arc::clone(&self.connections),
            self.config.dispatch.event_type.clone(),
        )
        .start(events_rx, shutdown.clone());

        tracing::info!(
            addr = %local_addr,
            ws_path = %self.config.server.ws_path,
            source = self.source.name(),
            signals = self.config.signals.len(),
            "Telemetry bridge started"
        );

        *running = Some(Running {
            shutdown,
            local_addr,
            sockets,
            server,
            poller,
            dispatcher,
        });
        Ok(local_addr)
    }

    /// Stop everything started by [`start`](Self::start).
    ///
    /// Idempotent: stopping a bridge that is not running does nothing. Tasks
    /// still running after `shutdown_timeout_seconds` are aborted.
    pub async fn stop(&self) {
        let mut guard = self.running.lock().await;
        let Some(running) = guard.take() else {
            tracing::debug!("Telemetry bridge not running, nothing to stop");
            return;
        };

        tracing::info!("Stopping telemetry bridge");
        running.shutdown.cancel();
        let closed = self.connections.close_all();
        running.sockets.close();

        let timeout = Duration::from_secs(self.config.server.shutdown_timeout_seconds);
        let deadline = tokio::time::Instant::now() + timeout;

        for (task, handle) in [
            ("server", running.server),
            ("poller", running.poller),
            ("dispatcher", running.dispatcher),
        ] {
            let abort = handle.abort_handle();
            if tokio::time::timeout_at(deadline, handle).await.is_err() {
                tracing::warn!(task, "Task did not stop in time, aborting");
                abort.abort();
            }
        }

        if tokio::time::timeout_at(deadline, running.sockets.wait())
            .await
            .is_err()
        {
            tracing::warn!(
                remaining = running.sockets.len(),
                "Push connections did not close in time"
            );
        }

        tracing::info!(connections_closed = closed, "Telemetry bridge stopped");
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().as_ref() {
            running.shutdown.cancel();
            self.connections.close_all();
        }
    }
}
