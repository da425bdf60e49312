//! Error types for shim archive operations

use thiserror::Error;
use wasmshim_crypto::Fingerprint;

/// Archive-specific error types
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The decompressed stream ended before a declared field was complete
    #[error("Truncated archive: stream ended while reading {context}")]
    Truncated {
        /// What was being read when the stream ended
        context: String,
    },

    /// The container is structurally inconsistent with its own header
    #[error("Malformed archive: {reason}")]
    Malformed {
        /// Description of the inconsistency
        reason: String,
    },

    /// No entry carries the requested fingerprint
    #[error("Fingerprint not found in archive: {0}")]
    FingerprintNotFound(Fingerprint),

    /// Compressed bytes do not hash to the expected container checksum
    #[error("Archive checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Checksum recorded when the archive was built
        expected: Fingerprint,
        /// Checksum of the bytes actually present
        actual: Fingerprint,
    },

    /// Error during zlib compression
    #[error("Compression error: {0}")]
    CompressionError(std::io::Error),

    /// Binary layout error from binrw
    #[error("Binary format error: {0}")]
    BinaryFormatError(#[from] binrw::Error),
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

impl ArchiveError {
    /// Create a truncation error for the named field
    pub fn truncated<S: Into<String>>(context: S) -> Self {
        Self::Truncated {
            context: context.into(),
        }
    }

    /// Create a malformed archive error with a reason
    pub fn malformed<S: Into<String>>(reason: S) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Map an I/O error raised while decoding `context`
    ///
    /// A short read is a truncation. Anything else the inflater reports
    /// means the deflate data itself is corrupt.
    pub(crate) fn from_read(error: &std::io::Error, context: &str) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::truncated(context)
        } else {
            Self::malformed(format!("{context}: {error}"))
        }
    }

    /// Check if this error indicates corrupt embedded data
    pub fn is_corruption_error(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. } | Self::Malformed { .. } | Self::ChecksumMismatch { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_read_error_mapping() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "short");
        assert!(matches!(
            ArchiveError::from_read(&eof, "entry 3 length"),
            ArchiveError::Truncated { ref context } if context == "entry 3 length"
        ));

        let corrupt = io::Error::new(io::ErrorKind::InvalidData, "invalid distance");
        let error = ArchiveError::from_read(&corrupt, "entry count");
        assert!(matches!(error, ArchiveError::Malformed { .. }));
        assert!(error.to_string().contains("invalid distance"));
    }

    #[test]
    fn test_error_categorization() {
        assert!(ArchiveError::truncated("x").is_corruption_error());
        assert!(ArchiveError::malformed("x").is_corruption_error());
        assert!(
            !ArchiveError::FingerprintNotFound(Fingerprint::from_data(b"A")).is_corruption_error()
        );
        assert!(!ArchiveError::CompressionError(io::Error::other("x")).is_corruption_error());
    }

    #[test]
    fn test_error_display() {
        let fingerprint = Fingerprint::from_data(b"A");
        let message = ArchiveError::FingerprintNotFound(fingerprint).to_string();
        assert!(message.contains(&fingerprint.to_hex()));
    }
}
