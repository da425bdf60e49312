//! Bundle manifest: version table stored next to an archive
//!
//! ```json
//! {
//!   "archive": "shims.bin",
//!   "archive_sha256": "9f86d0...",
//!   "versions": {
//!     "go1.21.0": "4b1c9a...",
//!     "go1.21.1": "4b1c9a..."
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use wasmshim_crypto::Fingerprint;

/// Default file name of the compressed archive
pub const ARCHIVE_FILE_NAME: &str = "shims.bin";

/// Default file name of the manifest
pub const MANIFEST_FILE_NAME: &str = "shims.json";

/// Manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Invalid JSON, or a field that failed to decode
    #[error("Invalid manifest JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Archive name is empty or points outside the bundle directory
    #[error("Invalid archive file name: {0:?}")]
    InvalidArchiveName(String),

    /// A version key is empty
    #[error("Manifest contains an empty version identifier")]
    EmptyVersion,
}

/// Version table plus the archive it refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Archive file name, relative to the manifest
    #[serde(default = "default_archive_name")]
    pub archive: String,

    /// SHA-256 of the compressed archive bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_sha256: Option<Fingerprint>,

    /// Version identifier to content fingerprint
    pub versions: BTreeMap<String, Fingerprint>,
}

fn default_archive_name() -> String {
    ARCHIVE_FILE_NAME.to_string()
}

impl BundleManifest {
    /// Create a manifest for the default archive file name
    pub fn new(versions: BTreeMap<String, Fingerprint>, archive_sha256: Fingerprint) -> Self {
        Self {
            archive: default_archive_name(),
            archive_sha256: Some(archive_sha256),
            versions,
        }
    }

    /// Parse and validate a manifest
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<(), ManifestError> {
        let name = self.archive.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(ManifestError::InvalidArchiveName(self.archive.clone()));
        }

        if self.versions.keys().any(String::is_empty) {
            return Err(ManifestError::EmptyVersion);
        }

        Ok(())
    }

    /// Distinct fingerprints referenced by the table, sorted
    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        let mut fingerprints: Vec<_> = self.versions.values().copied().collect();
        fingerprints.sort_unstable();
        fingerprints.dedup();
        fingerprints
    }
}
