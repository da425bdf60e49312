//! HTTP request handlers.
//!
//! Every resolution failure collapses to an empty `500` response; the cause
//! is only logged.

use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use wasmshim_resolver::ResolveError;

/// Content type of every successful response
pub const JAVASCRIPT: &str = "application/javascript";

/// Handle GET /wasm_exec.js endpoint.
///
/// Returns the shim for the configured toolchain version.
pub async fn handle_current_shim(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    tracing::debug!(
        "Handling shim request for current version {}",
        state.resolver().current_version()
    );

    let shim = state.resolver().current()?;
    Ok(javascript(shim))
}

/// Handle GET /launcher.js endpoint.
///
/// Returns the current shim followed by the bootstrap script.
pub async fn handle_launcher(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    tracing::debug!("Handling launcher request");

    let script = state.launcher_script()?;
    Ok(javascript(script))
}

/// Handle GET /versions/:version/wasm_exec.js endpoint.
///
/// Returns the shim for an explicit toolchain version.
pub async fn handle_version_shim(
    Path(version): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    tracing::debug!("Handling shim request for version {}", version);

    let shim = state.resolver().content(&version)?;
    Ok(javascript(shim))
}

fn javascript(body: Bytes) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, JAVASCRIPT)], body).into_response()
}

/// Application-level error type for HTTP handlers.
#[derive(Debug)]
pub struct AppError(ResolveError);

impl AppError {
    /// Underlying resolution error
    pub const fn inner(&self) -> &ResolveError {
        &self.0
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.0.is_corruption() {
            tracing::error!("Shim lookup failed on corrupt bundle: {}", self.0);
        } else {
            tracing::warn!("Shim lookup failed: {}", self.0);
        }

        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        Self(err)
    }
}
