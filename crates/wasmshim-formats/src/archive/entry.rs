//! Decoded archive entries

use bytes::Bytes;
use wasmshim_crypto::Fingerprint;

/// One content variant stored in the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Fingerprint recorded by the builder
    pub fingerprint: Fingerprint,
    /// Raw content bytes
    pub content: Bytes,
}

impl ArchiveEntry {
    /// Create an entry, computing the fingerprint of `content`
    pub fn new(content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            fingerprint: Fingerprint::from_data(&content),
            content,
        }
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the stored fingerprint matches the stored content
    pub fn is_intact(&self) -> bool {
        self.fingerprint.matches(&self.content)
    }
}
