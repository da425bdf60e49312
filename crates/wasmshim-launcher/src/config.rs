//! Launcher configuration management.
//!
//! Configuration can be provided via:
//! - CLI arguments (`--bind`, `--bundle`, etc.)
//! - Environment variables (`WASMSHIM_BIND`, etc.)
//! - Default values
//!
//! # Example
//!
//! ```no_run
//! use wasmshim_launcher::LauncherConfig;
//!
//! let config = LauncherConfig::from_args();
//! config.validate().expect("Invalid configuration");
//!
//! println!("Serving {} on {}", config.toolchain_version, config.bind);
//! ```

use crate::error::ConfigError;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use wasmshim_formats::MANIFEST_FILE_NAME;

/// Launcher configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wasmshim-launcher",
    about = "Serve the wasm_exec.js shim matching a toolchain version",
    version
)]
pub struct LauncherConfig {
    /// HTTP bind address
    #[arg(long, env = "WASMSHIM_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Directory holding shims.json and the archive it names
    #[arg(long, env = "WASMSHIM_BUNDLE", default_value = "./bundle")]
    pub bundle: PathBuf,

    /// Toolchain version the served application was built with
    #[arg(long, env = "WASMSHIM_TOOLCHAIN_VERSION")]
    pub toolchain_version: String,

    /// URL the bootstrap script fetches the WebAssembly binary from
    #[arg(long, env = "WASMSHIM_WASM_PATH", default_value = "app.wasm")]
    pub wasm_path: String,
}

impl LauncherConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Path of the bundle manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.bundle.join(MANIFEST_FILE_NAME)
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The bundle directory or its manifest doesn't exist
    /// - The toolchain version is empty
    /// - The wasm path is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bundle.is_dir() {
            return Err(ConfigError::MissingRequired(format!(
                "bundle directory not found: {}",
                self.bundle.display()
            )));
        }

        let manifest = self.manifest_path();
        if !manifest.is_file() {
            return Err(ConfigError::MissingRequired(format!(
                "bundle manifest not found: {}",
                manifest.display()
            )));
        }

        if self.toolchain_version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "toolchain version",
                reason: "must not be empty".to_string(),
            });
        }

        if self.wasm_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "wasm path",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
