//! `wasmshim pack`: build a bundle from per-tag checkouts

use crate::PackArgs;
use anyhow::{Context, Result, bail};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use wasmshim_crypto::Fingerprint;
use wasmshim_formats::{
    ARCHIVE_FILE_NAME, ArchiveBuilder, ArchiveReader, BundleManifest, MANIFEST_FILE_NAME,
};
use wasmshim_resolver::{LookupTable, ShimBundle};

/// Shim locations tried in a checkout, in order
pub fn default_shim_paths() -> Vec<String> {
    vec![
        "misc/wasm/wasm_exec.js".to_string(),
        "lib/wasm/wasm_exec.js".to_string(),
    ]
}

/// Shim file found for one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagShim {
    /// Tag name, taken from the checkout directory
    pub tag: String,
    /// File the shim was read from
    pub path: PathBuf,
}

/// Find the shim of every tag checkout under `source`
///
/// Tags are returned sorted by name. Checkouts without any of `paths` are
/// skipped.
pub fn scan_tags(
    source: &Path,
    tag_prefix: &str,
    paths: &[String],
    after: Option<&str>,
) -> Result<Vec<TagShim>> {
    let entries = fs::read_dir(source)
        .with_context(|| format!("Failed to read source directory {}", source.display()))?;

    let mut tags = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", source.display()))?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Ok(tag) = entry.file_name().into_string() else {
            warn!("Skipping non UTF-8 directory name {:?}", entry.file_name());
            continue;
        };
        if !tag.starts_with(tag_prefix) || after.is_some_and(|after| tag.as_str() <= after) {
            continue;
        }
        tags.push((tag, entry.path()));
    }
    tags.sort();

    let mut found = Vec::with_capacity(tags.len());
    for (tag, checkout) in tags {
        match paths.iter().map(|p| checkout.join(p)).find(|p| p.is_file()) {
            Some(path) => {
                debug!("{tag}: {}", path.display());
                found.push(TagShim { tag, path });
            }
            None => debug!("{tag}: no shim, skipping"),
        }
    }

    Ok(found)
}

/// Read every shim into a deduplicated bundle
pub fn build_bundle(shims: &[TagShim]) -> Result<ShimBundle> {
    let mut builder = ArchiveBuilder::new();
    let mut pairs = Vec::with_capacity(shims.len());
    for shim in shims {
        let content = fs::read(&shim.path)
            .with_context(|| format!("Failed to read {}", shim.path.display()))?;
        pairs.push((shim.tag.clone(), builder.add(content)));
    }

    let built = builder.build().context("Failed to build archive")?;
    info!(
        "Packed {} tags into {} distinct shims ({} bytes compressed)",
        pairs.len(),
        built.entry_count,
        built.data.len()
    );

    Ok(ShimBundle::new(
        LookupTable::from_pairs(pairs),
        ArchiveReader::new(built.data),
    ))
}

/// Render a Rust module that embeds the bundle
///
/// `archive_path` is written into `include_bytes!` as given, so it must be
/// relative to the module file or absolute.
pub fn render_rust_module(manifest: &BundleManifest, archive_path: &str) -> String {
    let mut module = String::new();
    module.push_str("// @generated by `wasmshim pack`. Do not edit.\n\n");
    module.push_str("/// Compressed shim archive\n");
    let _ = writeln!(
        module,
        "pub static ARCHIVE: &[u8] = include_bytes!({archive_path:?});\n"
    );
    module.push_str("/// Toolchain version to SHA-256 of its shim, sorted by version\n");
    module.push_str("pub static VERSIONS: &[(&str, &str)] = &[\n");
    for (version, fingerprint) in &manifest.versions {
        let _ = writeln!(module, "    ({version:?}, \"{fingerprint}\"),");
    }
    module.push_str("];\n");
    module
}

/// Path to use inside `include_bytes!` for an archive written to `out`
fn include_path(module: &Path, out: &Path) -> Result<String> {
    let archive = fs::canonicalize(out.join(ARCHIVE_FILE_NAME))
        .with_context(|| format!("Failed to resolve {}", out.display()))?;

    let module_dir = module
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let same_dir =
        fs::canonicalize(module_dir).is_ok_and(|dir| Some(dir.as_path()) == archive.parent());

    if same_dir {
        Ok(ARCHIVE_FILE_NAME.to_string())
    } else {
        Ok(archive.display().to_string())
    }
}

/// Whether `out` already holds exactly this manifest and its archive
fn is_unchanged(out: &Path, manifest: &BundleManifest) -> bool {
    let same_manifest = fs::read_to_string(out.join(MANIFEST_FILE_NAME))
        .ok()
        .and_then(|json| BundleManifest::from_json(&json).ok())
        .is_some_and(|existing| &existing == manifest);
    if !same_manifest {
        return false;
    }

    fs::read(out.join(&manifest.archive))
        .is_ok_and(|data| Some(Fingerprint::from_data(&data)) == manifest.archive_sha256)
}

/// Handle `wasmshim pack`
pub fn handle(args: PackArgs) -> Result<()> {
    if args.paths.is_empty() {
        bail!("At least one --path is required");
    }

    let shims = scan_tags(
        &args.source,
        &args.tag_prefix,
        &args.paths,
        args.after.as_deref(),
    )?;
    if shims.is_empty() {
        bail!(
            "No tag under {} with prefix {:?} contains a shim",
            args.source.display(),
            args.tag_prefix
        );
    }

    let bundle = build_bundle(&shims)?;
    let manifest = bundle.manifest();
    let checksum = bundle.archive().checksum();

    if is_unchanged(&args.out, &manifest) {
        info!("Bundle in {} is unchanged ({})", args.out.display(), checksum.short());
    } else {
        let manifest_path = bundle.save(&args.out)?;
        info!("Wrote {} ({})", manifest_path.display(), checksum.short());
    }

    if let Some(module) = &args.rust_module {
        let archive_path = include_path(module, &args.out)?;
        fs::write(module, render_rust_module(&manifest, &archive_path))
            .with_context(|| format!("Failed to write {}", module.display()))?;
        info!("Wrote {}", module.display());
    }

    Ok(())
}
