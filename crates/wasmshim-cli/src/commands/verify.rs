//! `wasmshim verify`: check a bundle end to end

use crate::{BundleArgs, OutputFormat};
use anyhow::{Result, bail};
use serde::Serialize;
use tracing::info;
use wasmshim_resolver::ShimBundle;

/// Outcome of verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Versions in the table
    pub versions: usize,
    /// Entries in the archive
    pub entries: usize,
    /// Versions whose fingerprint is missing from the archive
    pub missing: Vec<String>,
    /// Fingerprints of entries whose content does not match
    pub corrupt: Vec<String>,
    /// Fingerprints no version refers to
    pub unreferenced: Vec<String>,
    /// Versions that resolved with a matching fingerprint
    pub resolved: usize,
}

impl VerifyReport {
    /// Whether the bundle is usable
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty() && self.corrupt.is_empty() && self.resolved == self.versions
    }
}

/// Verify the bundle in `args.bundle`
///
/// Loading checks the archive checksum. The archive is then decoded in full
/// and every version is resolved through the integrity-checked path.
pub fn verify(args: &BundleArgs) -> Result<VerifyReport> {
    let bundle = ShimBundle::load(&args.bundle)?;
    let check = bundle.check()?;

    let mut report = VerifyReport {
        versions: check.versions,
        entries: check.entries,
        missing: check.missing.iter().map(|(v, _)| v.clone()).collect(),
        corrupt: check.corrupt.iter().map(ToString::to_string).collect(),
        unreferenced: check.unreferenced.iter().map(ToString::to_string).collect(),
        resolved: 0,
    };

    if check.is_consistent() {
        let resolver = bundle.into_resolver(String::new());
        report.resolved = resolver.preload_all()?;
        info!("Resolved {} versions", report.resolved);
    }

    Ok(report)
}

/// Handle `wasmshim verify`
pub fn handle(args: BundleArgs, format: OutputFormat) -> Result<()> {
    let report = verify(&args)?;

    match format {
        OutputFormat::Text => {
            println!(
                "{} versions, {} entries, {} resolved",
                report.versions, report.entries, report.resolved
            );
            for version in &report.missing {
                println!("missing: {version}");
            }
            for fingerprint in &report.corrupt {
                println!("corrupt: {fingerprint}");
            }
            for fingerprint in &report.unreferenced {
                println!("unreferenced: {fingerprint}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.is_ok() {
        bail!("Bundle in {} failed verification", args.bundle.display());
    }
    Ok(())
}
