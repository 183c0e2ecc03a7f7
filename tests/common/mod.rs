//! Shared test utilities for telemetry bridge integration tests.
//!
//! Provides a scriptable signal source, bridge and asset-root builders, and
//! a small WebSocket client wrapper.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use telemetry_bridge::bridge::Bridge;
use telemetry_bridge::config::BridgeConfig;
use telemetry_bridge::dispatch::{Envelope, TelemetryPayload};
use telemetry_bridge::source::{SignalSource, SignalSpec, SignalType, SignalValue, SourceError};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(5);

// =============================================================================
// Signal Source
// =============================================================================

/// Source whose readings are set by the test, keyed by address.
#[derive(Default)]
pub struct ScriptedSource {
    readings: Mutex<HashMap<String, Result<SignalValue, SourceError>>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set(&self, address: &str, value: SignalValue) {
        self.readings
            .lock()
            .unwrap()
            .insert(address.to_string(), Ok(value));
    }

    pub fn fail(&self, address: &str, error: SourceError) {
        self.readings
            .lock()
            .unwrap()
            .insert(address.to_string(), Err(error));
    }
}

#[async_trait]
impl SignalSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn read(&self, signal: &SignalSpec) -> Result<SignalValue, SourceError> {
        self.readings
            .lock()
            .unwrap()
            .get(&signal.address)
            .cloned()
            .unwrap_or_else(|| Err(SourceError::UnknownAddress(signal.address.clone())))
    }
}

// =============================================================================
// Bridge Builders
// =============================================================================

/// Write `files` (name, content) under `root`, creating directories.
pub fn write_pages(root: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = root.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

/// Fast-polling config on an ephemeral port tracking a single float "Torque" signal.
pub fn torque_config(asset_root: &Path) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.server.port = 0;
    config.server.shutdown_timeout_seconds = 2;
    config.poller.interval_ms = 10;
    config.assets.root = asset_root.to_path_buf();
    config.signals = vec![SignalSpec::new("Torque", "D100", SignalType::Float)];
    config
}

pub async fn start_bridge(
    config: BridgeConfig,
    source: Arc<dyn SignalSource>,
) -> (Bridge, SocketAddr) {
    let bridge = Bridge::new(config, source);
    let addr = bridge.start().await.expect("bridge should start");
    (bridge, addr)
}

/// Wait until the registry holds exactly `n` connections.
pub async fn wait_for_connections(bridge: &Bridge, n: usize) {
    let connections = Arc::clone(bridge.connections());
    tokio::time::timeout(WAIT, async move {
        while connections.len() != n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("expected {} push connections", n));
}

// =============================================================================
// WebSocket Client
// =============================================================================

pub struct PushClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PushClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let (ws, _) = connect_async(format!("ws://{}/ws", addr))
            .await
            .expect("websocket handshake");
        Self { ws }
    }

    pub async fn send_text(&mut self, text: &str) {
        self.ws.send(Message::Text(text.into())).await.unwrap();
    }

    /// Next text frame, or `None` if the server closed the connection.
    pub async fn next_text(&mut self) -> Option<String> {
        let next = tokio::time::timeout(WAIT, async {
            while let Some(Ok(message)) = self.ws.next().await {
                match message {
                    Message::Text(text) => return Some(text.as_str().to_string()),
                    Message::Close(_) => return None,
                    _ => continue,
                }
            }
            None
        });
        next.await.expect("timed out waiting for a frame")
    }

    /// Next telemetry update, decoded from the envelope.
    pub async fn next_update(&mut self) -> (Envelope, TelemetryPayload) {
        let text = self.next_text().await.expect("connection closed");
        let envelope: Envelope = serde_json::from_str(&text).unwrap();
        let payload: TelemetryPayload = serde_json::from_str(&envelope.data).unwrap();
        (envelope, payload)
    }

    /// Skip updates until one carries `value` for `signal`.
    pub async fn wait_for_value(&mut self, signal: &str, value: SignalValue) -> TelemetryPayload {
        loop {
            let (_, payload) = self.next_update().await;
            if payload.changed == signal && payload.value == value {
                return payload;
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
