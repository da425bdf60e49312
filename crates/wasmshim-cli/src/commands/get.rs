//! `wasmshim get`: write the shim for one version

use crate::GetArgs;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use tracing::info;
use wasmshim_resolver::ShimBundle;

/// Handle `wasmshim get`
pub fn handle(args: GetArgs) -> Result<()> {
    let resolver = ShimBundle::load(&args.bundle)?.into_resolver(args.version.clone());
    let shim = resolver
        .current()
        .with_context(|| format!("No shim for {}", args.version))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &shim)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", shim.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&shim)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
