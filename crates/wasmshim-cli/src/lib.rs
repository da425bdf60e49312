//! wasmshim CLI library
//!
//! This library provides the core functionality for the `wasmshim` tool.

pub mod commands;

// Re-export command handlers
pub use crate::commands::{
    get::handle as handle_get, list::handle as handle_list, pack::handle as handle_pack,
    verify::handle as handle_verify,
};

use clap::Args;
use std::path::PathBuf;

/// Output format for listings and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Options for `wasmshim pack`
#[derive(Debug, Clone, Args)]
pub struct PackArgs {
    /// Directory holding one checkout per toolchain tag
    #[arg(short, long)]
    pub source: PathBuf,

    /// Bundle output directory
    #[arg(short, long)]
    pub out: PathBuf,

    /// Shim location inside a checkout; the first one that exists wins
    #[arg(short, long = "path", default_values_t = commands::pack::default_shim_paths())]
    pub paths: Vec<String>,

    /// Only directories whose name starts with this prefix are tags
    #[arg(long, default_value = "go")]
    pub tag_prefix: String,

    /// Only pack tags that sort after this one
    #[arg(long)]
    pub after: Option<String>,

    /// Also write a Rust module embedding the bundle with `include_bytes!`
    #[arg(long)]
    pub rust_module: Option<PathBuf>,
}

/// Options for `wasmshim get`
#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Bundle directory
    #[arg(short, long)]
    pub bundle: PathBuf,

    /// Toolchain version to look up
    pub version: String,

    /// Write the shim to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Options for commands that only read a bundle
#[derive(Debug, Clone, Args)]
pub struct BundleArgs {
    /// Bundle directory
    #[arg(short, long)]
    pub bundle: PathBuf,
}
