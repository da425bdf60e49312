//! Error types for the launcher.

use thiserror::Error;
use wasmshim_resolver::BundleError;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration value
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// A value is present but unusable
    #[error("Invalid {field}: {reason}")]
    InvalidValue {
        /// Option name
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Server runtime errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind HTTP server
    #[error("Failed to bind HTTP server to {addr}: {source}")]
    HttpBindFailed {
        /// Address that failed to bind
        addr: std::net::SocketAddr,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Shim bundle could not be loaded
    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server shutdown error
    #[error("Server shutdown error: {0}")]
    Shutdown(String),
}
