//! Version lookup table

use crate::error::{BundleError, ResolveError, ResolveResult};
use std::collections::HashMap;
use wasmshim_crypto::Fingerprint;
use wasmshim_formats::BundleManifest;

/// Immutable mapping from version identifier to content fingerprint
///
/// Several versions usually map to the same fingerprint, since most
/// toolchain releases ship an unchanged shim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    versions: HashMap<String, Fingerprint>,
}

impl LookupTable {
    /// Build a table from version/fingerprint pairs
    ///
    /// A version listed twice keeps its last fingerprint.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Fingerprint)>,
        K: Into<String>,
    {
        Self {
            versions: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Build a table from a static `(version, hex fingerprint)` list
    pub fn from_hex_pairs(pairs: &[(&str, &str)]) -> Result<Self, BundleError> {
        let mut versions = HashMap::with_capacity(pairs.len());
        for (version, hex) in pairs {
            let fingerprint =
                Fingerprint::from_hex(hex).map_err(|source| BundleError::InvalidFingerprint {
                    version: (*version).to_string(),
                    source,
                })?;
            versions.insert((*version).to_string(), fingerprint);
        }
        Ok(Self { versions })
    }

    /// Resolve a version to its content fingerprint
    pub fn resolve(&self, version: &str) -> ResolveResult<Fingerprint> {
        self.versions
            .get(version)
            .copied()
            .ok_or_else(|| ResolveError::UnsupportedVersion(version.to_string()))
    }

    /// Whether the version is known
    pub fn contains(&self, version: &str) -> bool {
        self.versions.contains_key(version)
    }

    /// Number of versions
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// All versions, sorted
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.versions.keys().map(String::as_str).collect();
        versions.sort_unstable();
        versions
    }

    /// Distinct fingerprints, sorted
    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        let mut fingerprints: Vec<Fingerprint> = self.versions.values().copied().collect();
        fingerprints.sort_unstable();
        fingerprints.dedup();
        fingerprints
    }

    /// Iterate over `(version, fingerprint)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fingerprint)> {
        self.versions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<&BundleManifest> for LookupTable {
    fn from(manifest: &BundleManifest) -> Self {
        Self::from_pairs(manifest.versions.iter().map(|(k, v)| (k.clone(), *v)))
    }
}

impl<K: Into<String>> FromIterator<(K, Fingerprint)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (K, Fingerprint)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
