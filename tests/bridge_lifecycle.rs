//! Lifecycle tests: start, stop, restart and startup failures.

mod common;

use common::{start_bridge, torque_config, ScriptedSource};
use std::sync::Arc;
use telemetry_bridge::bridge::{Bridge, StartupError};
use telemetry_bridge::source::SignalValue;
use tempfile::TempDir;

fn scripted() -> Arc<ScriptedSource> {
    let source = ScriptedSource::new();
    source.set("D100", SignalValue::Float(10.0));
    source
}

#[tokio::test]
async fn test_stop_before_start_and_twice() {
    let dir = TempDir::new().unwrap();
    let bridge = Bridge::new(torque_config(dir.path()), scripted());

    bridge.stop().await;
    assert!(!bridge.is_running().await);

    bridge.start().await.unwrap();
    bridge.stop().await;
    bridge.stop().await;
    assert!(!bridge.is_running().await);
}

#[tokio::test]
async fn test_stop_releases_the_port() {
    let dir = TempDir::new().unwrap();
    let (bridge, addr) = start_bridge(torque_config(dir.path()), scripted()).await;

    assert!(reqwest::get(format!("http://{}/", addr)).await.is_ok());
    bridge.stop().await;

    // nothing is listening any more
    let listener = tokio::net::TcpListener::bind(addr).await;
    assert!(listener.is_ok());
}

#[tokio::test]
async fn test_bind_failure_leaves_nothing_running() {
    let dir = TempDir::new().unwrap();
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = torque_config(dir.path());
    config.server.port = taken.local_addr().unwrap().port();

    let bridge = Bridge::new(config, scripted());
    let err = bridge.start().await.unwrap_err();
    assert!(matches!(err, StartupError::Bind { .. }), "{}", err);
    assert!(!bridge.is_running().await);
    bridge.stop().await;
}

#[tokio::test]
async fn test_bootstrap_creates_default_dashboard() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("htmlPages");
    let (bridge, addr) = start_bridge(torque_config(&root), scripted()).await;

    assert!(root.join("index.html").is_file());
    let response = reqwest::get(format!("http://{}/main.js", addr)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/javascript"
    );

    bridge.stop().await;
}

#[tokio::test]
async fn test_restart_serves_again() {
    let dir = TempDir::new().unwrap();
    let bridge = Bridge::new(torque_config(dir.path()), scripted());

    bridge.start().await.unwrap();
    assert!(matches!(
        bridge.start().await,
        Err(StartupError::AlreadyRunning)
    ));
    bridge.stop().await;

    let second = bridge.start().await.unwrap();
    let response = reqwest::get(format!("http://{}/missing", second)).await.unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(bridge.local_addr().await, Some(second));

    bridge.stop().await;
}
