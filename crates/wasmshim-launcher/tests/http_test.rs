//! Integration tests for the launcher HTTP endpoints.
//!
//! These tests start a real HTTP server and make actual requests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use wasmshim_formats::{ArchiveBuilder, ArchiveReader};
use wasmshim_launcher::{AppState, LauncherConfig};
use wasmshim_resolver::{LookupTable, ShimBundle};

const SHIM_120: &str = "// wasm_exec.js go1.20\n";
const SHIM_121: &str = "// wasm_exec.js go1.21\n";

/// Create a bundle directory with two shim generations.
fn create_test_bundle() -> TempDir {
    let mut builder = ArchiveBuilder::new();
    let old = builder.add(SHIM_120.as_bytes().to_vec());
    let new = builder.add(SHIM_121.as_bytes().to_vec());
    let table = LookupTable::from_pairs([
        ("go1.20.0", old),
        ("go1.20.1", old),
        ("go1.21.0", new),
    ]);
    let archive = ArchiveReader::new(builder.build().expect("Failed to build archive").data);

    let dir = tempfile::tempdir().expect("Failed to create temporary bundle directory");
    ShimBundle::new(table, archive)
        .save(dir.path())
        .expect("Failed to write test bundle");
    dir
}

/// Start test HTTP server on random port.
async fn start_test_server(toolchain_version: &str) -> (SocketAddr, Arc<AppState>, TempDir) {
    // Install ring crypto provider for reqwest (idempotent)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let bundle = create_test_bundle();
    let config = LauncherConfig {
        bind: "127.0.0.1:0".parse().expect("Failed to parse bind address"),
        bundle: bundle.path().to_path_buf(),
        toolchain_version: toolchain_version.to_string(),
        wasm_path: "app.wasm".to_string(),
    };
    config.validate().expect("Test configuration should be valid");

    let state = Arc::new(AppState::new(&config).expect("Failed to initialize AppState"));
    let app = wasmshim_launcher::http::create_router(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind HTTP listener");
    let addr = listener
        .local_addr()
        .expect("Failed to get listener address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("HTTP server failed to run");
    });

    // Give server time to start
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    (addr, state, bundle)
}

fn content_type(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("content-type")
        .expect("Response should have content-type header")
        .to_str()
        .expect("Content-Type header should be valid UTF-8")
        .to_string()
}

#[tokio::test]
async fn test_current_shim() {
    let (addr, _state, _bundle) = start_test_server("go1.21.0").await;

    let response = reqwest::get(format!("http://{addr}/wasm_exec.js"))
        .await
        .expect("Failed to send GET request to test server");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/javascript");
    assert_eq!(response.text().await.unwrap(), SHIM_121);
}

#[tokio::test]
async fn test_launcher_appends_bootstrap() {
    let (addr, state, _bundle) = start_test_server("go1.20.1").await;

    let response = reqwest::get(format!("http://{addr}/launcher.js"))
        .await
        .expect("Failed to send GET request to test server");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/javascript");

    let body = response.text().await.unwrap();
    assert_eq!(body, format!("{SHIM_120}{}", state.bootstrap().as_str()));
    assert!(body.contains(r#"fetch("app.wasm")"#));
}

#[tokio::test]
async fn test_explicit_version() {
    let (addr, _state, _bundle) = start_test_server("go1.21.0").await;

    let response = reqwest::get(format!("http://{addr}/versions/go1.20.0/wasm_exec.js"))
        .await
        .expect("Failed to send GET request to test server");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), SHIM_120);
}

#[tokio::test]
async fn test_unsupported_current_version_returns_empty_500() {
    let (addr, _state, _bundle) = start_test_server("go0.0.1").await;

    for path in ["wasm_exec.js", "launcher.js"] {
        let response = reqwest::get(format!("http://{addr}/{path}"))
            .await
            .expect("Failed to send GET request to test server");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_unsupported_explicit_version_returns_empty_500() {
    let (addr, _state, _bundle) = start_test_server("go1.21.0").await;

    let response = reqwest::get(format!("http://{addr}/versions/go9.9.9/wasm_exec.js"))
        .await
        .expect("Failed to send GET request to test server");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_repeated_requests_hit_cache() {
    let (addr, state, _bundle) = start_test_server("go1.21.0").await;

    let client = reqwest::Client::new();
    for _ in 0..3 {
        let response = client
            .get(format!("http://{addr}/wasm_exec.js"))
            .send()
            .await
            .expect("Failed to send GET request to test server");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let stats = state.resolver().cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
}

#[tokio::test]
async fn test_unknown_route() {
    let (addr, _state, _bundle) = start_test_server("go1.21.0").await;

    let response = reqwest::get(format!("http://{addr}/app.wasm"))
        .await
        .expect("Failed to send GET request to test server");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
