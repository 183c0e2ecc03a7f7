//! Integration tests for static asset routes through the router.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::write_pages;
use std::sync::Arc;
use telemetry_bridge::api::{create_router, AppState};
use telemetry_bridge::assets::AssetServer;
use telemetry_bridge::config::BridgeConfig;
use telemetry_bridge::connections::ConnectionRegistry;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

/// Helper function to create a router over an asset root
fn create_test_app(root: &std::path::Path) -> axum::Router {
    let assets = AssetServer::new(root, "index.html").unwrap();
    let state = Arc::new(AppState::new(
        Arc::new(BridgeConfig::default()),
        assets,
        Arc::new(ConnectionRegistry::new()),
        CancellationToken::new(),
    ));
    create_router(state)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, String, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn test_root_and_index_are_identical() {
    let dir = TempDir::new().unwrap();
    write_pages(dir.path(), &[("index.html", "A")]);
    let app = create_test_app(dir.path());

    let root = get(&app, "/").await;
    let index = get(&app, "/index.html").await;
    assert_eq!(root, (StatusCode::OK, "text/html".to_string(), b"A".to_vec()));
    assert_eq!(root, index);
}

#[tokio::test]
async fn test_missing_file_is_404_html() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(dir.path());

    let (status, content_type, body) = get(&app, "/missing.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "text/html");
    assert_eq!(body, b"404 - Not Found");
}

#[tokio::test]
async fn test_table_content_types() {
    let dir = TempDir::new().unwrap();
    write_pages(
        dir.path(),
        &[
            ("styles.css", "body{}"),
            ("js/main.js", "1"),
            ("data/tags.json", "{}"),
            ("img/logo.svg", "<svg/>"),
            ("notes.txt", "plain"),
        ],
    );
    let app = create_test_app(dir.path());

    for (uri, expected) in [
        ("/styles.css", "text/css"),
        ("/js/main.js", "application/javascript"),
        ("/data/tags.json", "application/json"),
        ("/img/logo.svg", "image/svg+xml"),
        ("/notes.txt", "application/octet-stream"),
    ] {
        let (status, content_type, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(content_type, expected, "{}", uri);
    }
}

#[tokio::test]
async fn test_traversal_attempts_are_404() {
    let outer = TempDir::new().unwrap();
    std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
    let root = outer.path().join("pages");
    write_pages(&root, &[("index.html", "A")]);
    let app = create_test_app(&root);

    for uri in [
        "/../secret.txt",
        "/js/../../secret.txt",
        "/%2e%2e/secret.txt",
        "/..%2fsecret.txt",
    ] {
        let (status, _, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_ne!(body, b"secret");
    }
}

#[tokio::test]
async fn test_head_and_post() {
    let dir = TempDir::new().unwrap();
    write_pages(dir.path(), &[("index.html", "A")]);
    let app = create_test_app(dir.path());

    let head = Request::builder()
        .method("HEAD")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.clone().oneshot(head).await.unwrap().status(), StatusCode::OK);

    let post = Request::builder()
        .method("POST")
        .uri("/index.html")
        .body(Body::from("x"))
        .unwrap();
    let response = app.clone().oneshot(post).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()["allow"], "GET, HEAD");
}

#[tokio::test]
async fn test_push_path_is_not_an_asset() {
    let dir = TempDir::new().unwrap();
    // a file with the same name as the push endpoint must not be served
    write_pages(dir.path(), &[("ws", "not a socket")]);
    let app = create_test_app(dir.path());

    let (status, _, body) = get(&app, "/ws").await;
    assert_ne!(status, StatusCode::OK);
    assert_ne!(body, b"not a socket");
}
