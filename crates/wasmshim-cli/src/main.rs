use clap::{Parser, Subcommand};
use tracing::Level;

use wasmshim_cli::{BundleArgs, GetArgs, OutputFormat, PackArgs, commands};

#[derive(Parser)]
#[command(
    name = "wasmshim",
    about = "Pack, inspect and verify wasm_exec.js shim bundles",
    version,
    author,
    long_about = "A command-line tool for building the compressed shim archive and version table used to serve the wasm_exec.js matching a toolchain version."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a bundle from a directory of per-tag checkouts
    Pack(PackArgs),

    /// Write the shim for a toolchain version
    Get(GetArgs),

    /// List versions and their shim fingerprints
    List(BundleArgs),

    /// Check the archive checksum and resolve every version
    Verify(BundleArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `get` can stream the shim on stdout
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Pack(args) => commands::pack::handle(args)?,
        Commands::Get(args) => commands::get::handle(args)?,
        Commands::List(args) => commands::list::handle(args, cli.format)?,
        Commands::Verify(args) => commands::verify::handle(args, cli.format)?,
    }

    Ok(())
}
