//! Error types for shim resolution and bundle loading

use std::path::PathBuf;
use thiserror::Error;
use wasmshim_crypto::Fingerprint;
use wasmshim_formats::{ArchiveError, ManifestError};

/// Errors returned by [`VersionResolver`](crate::VersionResolver)
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Version identifier is not in the lookup table
    #[error("unsupported version {0:?}")]
    UnsupportedVersion(String),

    /// The table references a fingerprint the archive does not contain
    #[error("fingerprint {fingerprint} for version {version:?} not found in archive")]
    FingerprintNotFound {
        /// Version being resolved
        version: String,
        /// Fingerprint the table maps it to
        fingerprint: Fingerprint,
    },

    /// The archive ended before a declared field was complete
    #[error("truncated archive: {0}")]
    TruncatedArchive(String),

    /// The archive is inconsistent with its own header
    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    /// Returned content does not hash to the requested fingerprint
    #[error("integrity mismatch for version {version:?}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        /// Version being resolved
        version: String,
        /// Fingerprint from the table
        expected: Fingerprint,
        /// Fingerprint of the bytes the archive returned
        actual: Fingerprint,
    },
}

/// Result type for resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

impl ResolveError {
    /// Convert an archive lookup failure for `version`
    pub fn from_archive(version: &str, error: ArchiveError) -> Self {
        match error {
            ArchiveError::FingerprintNotFound(fingerprint) => Self::FingerprintNotFound {
                version: version.to_string(),
                fingerprint,
            },
            ArchiveError::Truncated { context } => Self::TruncatedArchive(context),
            ArchiveError::Malformed { reason } => Self::MalformedArchive(reason),
            other => Self::MalformedArchive(other.to_string()),
        }
    }

    /// Check if this error indicates corrupt embedded data
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::TruncatedArchive(_) | Self::MalformedArchive(_) | Self::IntegrityMismatch { .. }
        )
    }
}

/// Errors raised while loading a bundle
#[derive(Debug, Error)]
pub enum BundleError {
    /// Failed to read a bundle file
    #[error("failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Manifest could not be parsed or validated
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Archive failed a structural or checksum check
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// A static table entry carries invalid hex
    #[error("invalid fingerprint for version {version:?}: {source}")]
    InvalidFingerprint {
        /// Version whose fingerprint failed to parse
        version: String,
        /// Hex decoding error
        #[source]
        source: hex::FromHexError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_conversion() {
        let fingerprint = Fingerprint::from_data(b"A");
        let error = ResolveError::from_archive("v1", ArchiveError::FingerprintNotFound(fingerprint));
        assert!(matches!(
            error,
            ResolveError::FingerprintNotFound { ref version, .. } if version == "v1"
        ));
        assert!(!error.is_corruption());

        let error = ResolveError::from_archive("v1", ArchiveError::truncated("entry count"));
        assert!(matches!(error, ResolveError::TruncatedArchive(ref c) if c == "entry count"));
        assert!(error.is_corruption());

        let error = ResolveError::from_archive("v1", ArchiveError::malformed("bad"));
        assert!(matches!(error, ResolveError::MalformedArchive(_)));
    }

    #[test]
    fn test_error_messages() {
        let error = ResolveError::UnsupportedVersion("go0.1".to_string());
        assert_eq!(error.to_string(), "unsupported version \"go0.1\"");
    }
}
