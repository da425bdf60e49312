//! Launcher HTTP responder.
//!
//! Serves the `wasm_exec.js` shim matching the toolchain that built the
//! application, optionally followed by a small bootstrap script that fetches
//! and runs the application's WebAssembly binary.
//!
//! # Architecture
//!
//! - `config`: Configuration loading and validation
//! - `bootstrap`: The script appended to the shim on `/launcher.js`
//! - `server`: Shared state and server orchestration
//! - `http`: Router and handlers
//!
//! # Example
//!
//! ```no_run
//! use wasmshim_launcher::{LauncherConfig, Server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     tracing_subscriber::fmt::init();
//!
//!     let config = LauncherConfig::from_args();
//!     config.validate()?;
//!
//!     let server = Server::new(config)?;
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod http;
pub mod server;

pub use bootstrap::Bootstrap;
pub use config::LauncherConfig;
pub use error::{ConfigError, ServerError};
pub use server::{AppState, Server};
