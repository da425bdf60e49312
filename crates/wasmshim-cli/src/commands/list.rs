//! `wasmshim list`: print the version table

use crate::{BundleArgs, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use wasmshim_crypto::Fingerprint;
use wasmshim_resolver::{LookupTable, ShimBundle};

/// One row of the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRow {
    /// Toolchain version
    pub version: String,
    /// Fingerprint of its shim
    pub fingerprint: Fingerprint,
}

/// Table rows sorted by version
pub fn rows(table: &LookupTable) -> Vec<VersionRow> {
    table
        .versions()
        .into_iter()
        .filter_map(|version| {
            table.resolve(version).ok().map(|fingerprint| VersionRow {
                version: version.to_string(),
                fingerprint,
            })
        })
        .collect()
}

/// Render rows as aligned text
pub fn render_text(rows: &[VersionRow], distinct: usize) -> String {
    let width = rows.iter().map(|r| r.version.len()).max().unwrap_or(0);
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{:<width$}  {}", row.version, row.fingerprint);
    }
    let _ = writeln!(out, "{} versions, {distinct} distinct shims", rows.len());
    out
}

/// Handle `wasmshim list`
pub fn handle(args: BundleArgs, format: OutputFormat) -> Result<()> {
    let bundle = ShimBundle::load(&args.bundle)?;
    let rows = rows(bundle.table());

    match format {
        OutputFormat::Text => {
            print!("{}", render_text(&rows, bundle.table().fingerprints().len()));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    Ok(())
}
