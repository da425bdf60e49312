//! wasmshim launcher binary entry point.
//!
//! This is a thin wrapper around the wasmshim-launcher library that:
//! 1. Initializes logging
//! 2. Parses and validates configuration
//! 3. Loads the shim bundle
//! 4. Starts the server

use anyhow::Result;
use wasmshim_launcher::{LauncherConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = LauncherConfig::from_args();

    tracing::info!(
        "Configuration loaded: bind={}, bundle={:?}, version={}, wasm={}",
        config.bind,
        config.bundle,
        config.toolchain_version,
        config.wasm_path
    );

    config.validate()?;

    let server = Server::new(config)?;
    server.run().await?;

    Ok(())
}
