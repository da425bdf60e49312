//! Content source trait
//!
//! The resolver asks a [`ShimSource`] for the bytes stored under a
//! fingerprint. [`ArchiveReader`] is the production implementation; tests
//! and embedders can wrap it, for example to count decompressions.

use bytes::Bytes;
use std::sync::Arc;
use wasmshim_crypto::Fingerprint;
use wasmshim_formats::{ArchiveError, ArchiveReader};

/// Trait for looking up content by fingerprint
pub trait ShimSource: Send + Sync {
    /// Return the raw bytes stored under `fingerprint`
    fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Result<Bytes, ArchiveError>;
}

impl ShimSource for ArchiveReader {
    fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Result<Bytes, ArchiveError> {
        self.find(fingerprint)
    }
}

impl<S: ShimSource + ?Sized> ShimSource for Arc<S> {
    fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Result<Bytes, ArchiveError> {
        (**self).find_by_fingerprint(fingerprint)
    }
}

impl<S: ShimSource + ?Sized> ShimSource for Box<S> {
    fn find_by_fingerprint(&self, fingerprint: &Fingerprint) -> Result<Bytes, ArchiveError> {
        (**self).find_by_fingerprint(fingerprint)
    }
}
