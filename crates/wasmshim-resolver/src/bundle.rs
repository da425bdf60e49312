//! Shim bundles: an archive together with its version table
//!
//! Bundles come from two places:
//! - files on disk (`shims.json` next to `shims.bin`), loaded at startup
//! - static data compiled into the binary with `include_bytes!`

use crate::error::BundleError;
use crate::resolver::VersionResolver;
use crate::table::LookupTable;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use wasmshim_crypto::Fingerprint;
use wasmshim_formats::{ArchiveReader, BundleManifest, MANIFEST_FILE_NAME};

/// Archive plus version table
#[derive(Debug, Clone)]
pub struct ShimBundle {
    table: LookupTable,
    archive: ArchiveReader,
}

impl ShimBundle {
    /// Pair a table with an archive
    pub fn new(table: LookupTable, archive: ArchiveReader) -> Self {
        Self { table, archive }
    }

    /// Load `shims.json` and the archive it names from `dir`
    ///
    /// When the manifest records an archive checksum, the archive bytes are
    /// verified against it before the bundle is returned.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, BundleError> {
        let dir = dir.as_ref();
        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        let json = fs::read_to_string(&manifest_path).map_err(|source| BundleError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest = BundleManifest::from_json(&json)?;

        let archive_path = dir.join(&manifest.archive);
        let data = fs::read(&archive_path).map_err(|source| BundleError::Io {
            path: archive_path.clone(),
            source,
        })?;
        let archive = ArchiveReader::new(data);
        if let Some(expected) = &manifest.archive_sha256 {
            archive.verify_checksum(expected)?;
        }

        info!(
            "Loaded shim bundle from {} ({} versions, {} bytes compressed)",
            dir.display(),
            manifest.versions.len(),
            archive.data().len()
        );

        Ok(Self::new(LookupTable::from(&manifest), archive))
    }

    /// Build a bundle from data compiled into the binary
    ///
    /// ```
    /// use wasmshim_resolver::ShimBundle;
    ///
    /// // zlib stream holding an empty archive
    /// static ARCHIVE: &[u8] = &[
    ///     0x78, 0xda, 0x63, 0x60, 0x60, 0x60, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01,
    /// ];
    /// static VERSIONS: &[(&str, &str)] = &[];
    ///
    /// let bundle = ShimBundle::from_static(ARCHIVE, VERSIONS).expect("valid static table");
    /// assert!(bundle.table().is_empty());
    /// ```
    pub fn from_static(
        archive: &'static [u8],
        versions: &[(&str, &str)],
    ) -> Result<Self, BundleError> {
        Ok(Self::new(
            LookupTable::from_hex_pairs(versions)?,
            ArchiveReader::from_static(archive),
        ))
    }

    /// Version table
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Archive reader
    pub fn archive(&self) -> &ArchiveReader {
        &self.archive
    }

    /// Manifest describing this bundle, with the archive checksum filled in
    pub fn manifest(&self) -> BundleManifest {
        let versions: BTreeMap<String, Fingerprint> = self
            .table
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        BundleManifest::new(versions, self.archive.checksum())
    }

    /// Write the bundle into `dir` as `shims.json` plus the archive file
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, BundleError> {
        let dir = dir.as_ref();
        let manifest = self.manifest();

        fs::create_dir_all(dir).map_err(|source| BundleError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let archive_path = dir.join(&manifest.archive);
        fs::write(&archive_path, self.archive.data()).map_err(|source| BundleError::Io {
            path: archive_path,
            source,
        })?;

        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        fs::write(&manifest_path, manifest.to_json()?).map_err(|source| BundleError::Io {
            path: manifest_path.clone(),
            source,
        })?;

        Ok(manifest_path)
    }

    /// Decode the whole archive once and cross-check it against the table
    pub fn check(&self) -> Result<BundleReport, BundleError> {
        let entries = self.archive.entries()?;

        let stored: BTreeSet<Fingerprint> = entries.iter().map(|e| e.fingerprint).collect();
        let corrupt: Vec<Fingerprint> = entries
            .iter()
            .filter(|e| !e.is_intact())
            .map(|e| e.fingerprint)
            .collect();

        let mut missing: Vec<(String, Fingerprint)> = self
            .table
            .iter()
            .filter(|(_, f)| !stored.contains(*f))
            .map(|(v, f)| (v.to_string(), *f))
            .collect();
        missing.sort();

        let referenced: BTreeSet<Fingerprint> = self.table.fingerprints().into_iter().collect();
        let unreferenced = stored.difference(&referenced).copied().collect();

        Ok(BundleReport {
            versions: self.table.len(),
            entries: entries.len(),
            missing,
            corrupt,
            unreferenced,
        })
    }

    /// Turn the bundle into a resolver for `current_version`
    pub fn into_resolver(self, current_version: impl Into<String>) -> VersionResolver {
        VersionResolver::new(self.table, self.archive, current_version)
    }
}

/// Result of [`ShimBundle::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    /// Versions in the table
    pub versions: usize,
    /// Entries in the archive
    pub entries: usize,
    /// Versions whose fingerprint has no archive entry
    pub missing: Vec<(String, Fingerprint)>,
    /// Entries whose content does not hash to their fingerprint
    pub corrupt: Vec<Fingerprint>,
    /// Entries no version refers to
    pub unreferenced: Vec<Fingerprint>,
}

impl BundleReport {
    /// Whether every version resolves to intact content
    ///
    /// Unreferenced entries waste space but do not make a bundle unusable.
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.corrupt.is_empty()
    }
}
