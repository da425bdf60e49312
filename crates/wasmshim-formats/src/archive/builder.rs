//! Archive builder
//!
//! Collects content variants, deduplicates them by fingerprint and writes the
//! container with entries sorted by fingerprint so the same input set always
//! produces the same bytes.

use crate::archive::{
    error::{ArchiveError, ArchiveResult},
    header::{ArchiveHeader, EntryHeader},
};
use binrw::BinWrite;
use flate2::{Compression, write::ZlibEncoder};
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use wasmshim_crypto::Fingerprint;

/// Compress data with zlib at maximum compression level
pub fn compress_zlib(data: &[u8]) -> ArchiveResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .map_err(ArchiveError::CompressionError)?;
    encoder.finish().map_err(ArchiveError::CompressionError)
}

/// Output of [`ArchiveBuilder::build`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArchive {
    /// Compressed container bytes
    pub data: Vec<u8>,
    /// SHA-256 of `data`
    pub checksum: Fingerprint,
    /// Number of distinct entries written
    pub entry_count: u32,
}

/// Builder for shim archives
///
/// # Examples
///
/// ```rust
/// use wasmshim_formats::archive::{ArchiveBuilder, ArchiveReader};
///
/// let mut builder = ArchiveBuilder::new();
/// let a = builder.add(b"A".to_vec());
/// let again = builder.add(b"A".to_vec());
/// assert_eq!(a, again);
///
/// let built = builder.build().expect("Operation should succeed");
/// assert_eq!(built.entry_count, 1);
///
/// let reader = ArchiveReader::new(built.data);
/// assert_eq!(&reader.find(&a).expect("Operation should succeed")[..], b"A");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    entries: BTreeMap<Fingerprint, Vec<u8>>,
}

impl ArchiveBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content and return its fingerprint
    ///
    /// Adding the same content twice stores it once.
    pub fn add(&mut self, content: Vec<u8>) -> Fingerprint {
        let fingerprint = Fingerprint::from_data(&content);
        self.entries.entry(fingerprint).or_insert(content);
        fingerprint
    }

    /// Whether content with this fingerprint has been added
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no content has been added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode the uncompressed container stream
    pub fn encode_payload(&self) -> ArchiveResult<Vec<u8>> {
        let entry_count = u32::try_from(self.entries.len())
            .map_err(|_| ArchiveError::malformed("more than u32::MAX entries"))?;

        let total: usize = self
            .entries
            .values()
            .map(|content| EntryHeader::SIZE + content.len())
            .sum();
        let mut payload = Vec::with_capacity(ArchiveHeader::SIZE + total);
        let mut cursor = Cursor::new(&mut payload);

        ArchiveHeader { entry_count }.write(&mut cursor)?;
        for (fingerprint, content) in &self.entries {
            let length = i64::try_from(content.len())
                .map_err(|_| ArchiveError::malformed("content larger than i64::MAX"))?;
            EntryHeader {
                fingerprint: *fingerprint,
                length,
            }
            .write(&mut cursor)?;
            cursor
                .write_all(content)
                .map_err(ArchiveError::CompressionError)?;
        }

        Ok(payload)
    }

    /// Encode and compress the container
    pub fn build(&self) -> ArchiveResult<BuiltArchive> {
        let payload = self.encode_payload()?;
        let data = compress_zlib(&payload)?;
        Ok(BuiltArchive {
            checksum: Fingerprint::from_data(&data),
            entry_count: self.entries.len() as u32,
            data,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_payload_layout() {
        let mut builder = ArchiveBuilder::new();
        let a = builder.add(b"A".to_vec());
        let bb = builder.add(b"BB".to_vec());

        let payload = builder.encode_payload().unwrap();
        assert_eq!(payload.len(), 4 + (40 + 1) + (40 + 2));
        assert_eq!(&payload[..4], &[0, 0, 0, 2]);

        // Entries are sorted by fingerprint
        let (first, second) = if a < bb { (a, bb) } else { (bb, a) };
        assert_eq!(&payload[4..36], first.as_bytes());
        let second_offset = 4 + 40 + if first == a { 1 } else { 2 };
        assert_eq!(
            &payload[second_offset..second_offset + 32],
            second.as_bytes()
        );
    }

    #[test]
    fn test_deduplicates_content() {
        let mut builder = ArchiveBuilder::new();
        builder.add(b"same".to_vec());
        builder.add(b"same".to_vec());
        builder.add(b"other".to_vec());
        assert_eq!(builder.len(), 2);
        assert_eq!(builder.build().unwrap().entry_count, 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut forward = ArchiveBuilder::new();
        forward.add(b"one".to_vec());
        forward.add(b"two".to_vec());

        let mut backward = ArchiveBuilder::new();
        backward.add(b"two".to_vec());
        backward.add(b"one".to_vec());

        let left = forward.build().unwrap();
        let right = backward.build().unwrap();
        assert_eq!(left, right);
        assert_eq!(left.checksum, Fingerprint::from_data(&left.data));
    }

    #[test]
    fn test_empty_archive() {
        let builder = ArchiveBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.encode_payload().unwrap(), vec![0, 0, 0, 0]);
    }
}
