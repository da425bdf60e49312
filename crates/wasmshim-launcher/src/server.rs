//! Server state management and orchestration.

use crate::bootstrap::Bootstrap;
use crate::config::LauncherConfig;
use crate::error::ServerError;
use bytes::Bytes;
use std::sync::Arc;
use wasmshim_resolver::{ResolveResult, ShimBundle, VersionResolver};

/// Shared application state for the HTTP handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Resolver over the loaded bundle
    resolver: Arc<VersionResolver>,

    /// Script appended on `/launcher.js`
    bootstrap: Bootstrap,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if the bundle cannot be loaded.
    pub fn new(config: &LauncherConfig) -> Result<Self, ServerError> {
        tracing::info!("Loading shim bundle from {:?}", config.bundle);

        let bundle = ShimBundle::load(&config.bundle)?;
        if !bundle.table().contains(&config.toolchain_version) {
            tracing::warn!(
                "Toolchain version {} is not in the bundle, shim requests will fail",
                config.toolchain_version
            );
        }

        let resolver = bundle.into_resolver(config.toolchain_version.clone());
        Ok(Self::from_resolver(resolver, Bootstrap::new(&config.wasm_path)))
    }

    /// Create application state around an existing resolver.
    #[must_use]
    pub fn from_resolver(resolver: VersionResolver, bootstrap: Bootstrap) -> Self {
        Self {
            resolver: Arc::new(resolver),
            bootstrap,
        }
    }

    /// Get reference to the resolver.
    #[must_use]
    pub const fn resolver(&self) -> &Arc<VersionResolver> {
        &self.resolver
    }

    /// Get the bootstrap script.
    #[must_use]
    pub const fn bootstrap(&self) -> &Bootstrap {
        &self.bootstrap
    }

    /// Shim for the configured toolchain version followed by the bootstrap.
    pub fn launcher_script(&self) -> ResolveResult<Bytes> {
        let shim = self.resolver.current()?;
        Ok(self.bootstrap.append_to(&shim))
    }
}

/// Server orchestration.
pub struct Server {
    /// Shared application state
    state: Arc<AppState>,
    /// Launcher configuration
    config: LauncherConfig,
}

impl Server {
    /// Create new server with configuration.
    ///
    /// Loads the shim bundle and prepares shared state.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if the bundle cannot be loaded.
    pub fn new(config: LauncherConfig) -> Result<Self, ServerError> {
        let state = AppState::new(&config)?;

        tracing::info!(
            "Server initialized with {} versions, serving {}",
            state.resolver().table().len(),
            state.resolver().current_version()
        );

        Ok(Self {
            state: Arc::new(state),
            config,
        })
    }

    /// Run the server.
    ///
    /// The server runs until interrupted or an error occurs.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if binding fails or the shutdown signal cannot
    /// be installed.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting wasmshim launcher");
        tracing::info!("HTTP server binding to: {}", self.config.bind);

        let mut http_server = tokio::spawn(crate::http::start_server(
            self.config.bind,
            Arc::clone(&self.state),
        ));

        tokio::select! {
            result = &mut http_server => {
                return match result {
                    Ok(served) => served,
                    Err(e) => Err(ServerError::Shutdown(format!("HTTP server task failed: {e}"))),
                };
            }
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(|e| {
                    ServerError::Shutdown(format!("Failed to listen for shutdown signal: {e}"))
                })?;
            }
        }

        tracing::info!("Shutdown signal received, stopping server");
        http_server.abort();

        Ok(())
    }

    /// Get shared application state.
    #[must_use]
    pub const fn state(&self) -> &Arc<AppState> {
        &self.state
    }
}
