//! Archive reader: incremental decompression and linear fingerprint scan

use crate::archive::{
    entry::ArchiveEntry,
    error::{ArchiveError, ArchiveResult},
    header::{ArchiveHeader, EntryHeader},
    stream::InflateStream,
};
use bytes::Bytes;
use std::io::{self, Read};
use wasmshim_crypto::Fingerprint;

// Upper bound on the up-front allocation for one entry; the real length is
// only trusted once the bytes have actually been inflated.
const MAX_PREALLOC: u64 = 1024 * 1024;

/// Reader over a compressed shim archive
///
/// The reader never decompresses more than it has to: a lookup stops at the
/// first entry whose fingerprint matches, so its cost is bounded by that
/// entry's position in the container.
#[derive(Debug, Clone)]
pub struct ArchiveReader {
    data: Bytes,
}

impl ArchiveReader {
    /// Wrap compressed container bytes
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Wrap container bytes compiled into the binary
    pub const fn from_static(data: &'static [u8]) -> Self {
        Self {
            data: Bytes::from_static(data),
        }
    }

    /// Compressed container bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// SHA-256 of the compressed container
    pub fn checksum(&self) -> Fingerprint {
        Fingerprint::from_data(&self.data)
    }

    /// Compare the container checksum with the one recorded at build time
    pub fn verify_checksum(&self, expected: &Fingerprint) -> ArchiveResult<()> {
        let actual = self.checksum();
        if actual == *expected {
            Ok(())
        } else {
            Err(ArchiveError::ChecksumMismatch {
                expected: *expected,
                actual,
            })
        }
    }

    /// Declared number of entries
    pub fn entry_count(&self) -> ArchiveResult<u32> {
        let mut stream = InflateStream::new(&self.data);
        Ok(ArchiveHeader::read_from(&mut stream)?.entry_count)
    }

    /// Find the content stored under `wanted`
    ///
    /// Entries are scanned in container order. When every declared entry has
    /// been read without a match, the stream must also be exhausted: leftover
    /// decompressed data or compressed bytes after the zlib end marker make
    /// the archive malformed rather than merely missing the fingerprint.
    pub fn find(&self, wanted: &Fingerprint) -> ArchiveResult<Bytes> {
        let mut stream = InflateStream::new(&self.data);
        let header = ArchiveHeader::read_from(&mut stream)?;

        for index in 0..header.entry_count {
            let entry = EntryHeader::read_from(&mut stream, index)?;
            let length = entry.content_length()?;

            if entry.fingerprint == *wanted {
                let content = read_content(&mut stream, length, index)?;
                return Ok(Bytes::from(content));
            }
            skip_content(&mut stream, length, index)?;
        }

        ensure_exhausted(&mut stream, header.entry_count)?;
        Err(ArchiveError::FingerprintNotFound(*wanted))
    }

    /// Decode every entry in container order
    pub fn entries(&self) -> ArchiveResult<Vec<ArchiveEntry>> {
        let mut stream = InflateStream::new(&self.data);
        let header = ArchiveHeader::read_from(&mut stream)?;

        let mut entries = Vec::with_capacity(header.entry_count.min(1024) as usize);
        for index in 0..header.entry_count {
            let entry = EntryHeader::read_from(&mut stream, index)?;
            let content = read_content(&mut stream, entry.content_length()?, index)?;
            entries.push(ArchiveEntry {
                fingerprint: entry.fingerprint,
                content: Bytes::from(content),
            });
        }

        ensure_exhausted(&mut stream, header.entry_count)?;
        Ok(entries)
    }
}

fn read_content<R: Read>(reader: &mut R, length: u64, index: u32) -> ArchiveResult<Vec<u8>> {
    let mut content = Vec::with_capacity(length.min(MAX_PREALLOC) as usize);
    let read = reader
        .take(length)
        .read_to_end(&mut content)
        .map_err(|e| ArchiveError::from_read(&e, &format!("content of entry {index}")))?;
    if read as u64 != length {
        return Err(ArchiveError::truncated(format!(
            "content of entry {index} ({read} of {length} bytes)"
        )));
    }
    Ok(content)
}

fn skip_content<R: Read>(reader: &mut R, length: u64, index: u32) -> ArchiveResult<()> {
    let skipped = io::copy(&mut reader.take(length), &mut io::sink())
        .map_err(|e| ArchiveError::from_read(&e, &format!("content of entry {index}")))?;
    if skipped != length {
        return Err(ArchiveError::truncated(format!(
            "content of entry {index} ({skipped} of {length} bytes)"
        )));
    }
    Ok(())
}

fn ensure_exhausted(stream: &mut InflateStream<'_>, entry_count: u32) -> ArchiveResult<()> {
    let mut probe = [0u8; 1];
    let read = stream
        .read(&mut probe)
        .map_err(|e| ArchiveError::from_read(&e, "end of stream"))?;
    if read != 0 {
        return Err(ArchiveError::malformed(format!(
            "data continues after the {entry_count} declared entries"
        )));
    }

    let trailing = stream.trailing_input();
    if trailing > 0 {
        return Err(ArchiveError::malformed(format!(
            "{trailing} bytes follow the compressed stream"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveBuilder, compress_zlib};
    use pretty_assertions::assert_eq;

    fn two_entry_archive() -> (ArchiveReader, Fingerprint, Fingerprint) {
        let mut builder = ArchiveBuilder::new();
        let a = builder.add(b"A".to_vec());
        let bb = builder.add(b"BB".to_vec());
        (ArchiveReader::new(builder.build().unwrap().data), a, bb)
    }

    #[test]
    fn test_find_known_fingerprints() {
        let (reader, a, bb) = two_entry_archive();
        assert_eq!(&reader.find(&a).unwrap()[..], b"A");
        assert_eq!(&reader.find(&bb).unwrap()[..], b"BB");
    }

    #[test]
    fn test_find_unknown_fingerprint() {
        let (reader, _, _) = two_entry_archive();
        let missing = Fingerprint::from_data(b"C");
        assert!(matches!(
            reader.find(&missing),
            Err(ArchiveError::FingerprintNotFound(f)) if f == missing
        ));
    }

    #[test]
    fn test_decoding_is_repeatable() {
        let (reader, a, _) = two_entry_archive();
        assert_eq!(reader.find(&a).unwrap(), reader.find(&a).unwrap());
        assert_eq!(reader.entries().unwrap(), reader.entries().unwrap());
    }

    #[test]
    fn test_entries_in_container_order() {
        let (reader, a, bb) = two_entry_archive();
        let entries = reader.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].fingerprint < entries[1].fingerprint);
        assert!(entries.iter().all(ArchiveEntry::is_intact));

        let fingerprints: Vec<_> = entries.iter().map(|e| e.fingerprint).collect();
        assert!(fingerprints.contains(&a));
        assert!(fingerprints.contains(&bb));
        assert_eq!(reader.entry_count().unwrap(), 2);
    }

    #[test]
    fn test_extra_decompressed_byte_is_malformed() {
        let mut builder = ArchiveBuilder::new();
        let a = builder.add(b"A".to_vec());
        let mut payload = builder.encode_payload().unwrap();
        payload.push(0x00);
        let reader = ArchiveReader::new(compress_zlib(&payload).unwrap());

        // A hit returns before the trailing byte is reached
        assert_eq!(&reader.find(&a).unwrap()[..], b"A");

        let missing = Fingerprint::from_data(b"nope");
        assert!(matches!(
            reader.find(&missing),
            Err(ArchiveError::Malformed { .. })
        ));
        assert!(matches!(reader.entries(), Err(ArchiveError::Malformed { .. })));
    }

    #[test]
    fn test_bytes_after_end_marker_are_malformed() {
        let mut builder = ArchiveBuilder::new();
        builder.add(b"A".to_vec());
        let mut data = builder.build().unwrap().data;
        data.push(0x42);
        let reader = ArchiveReader::new(data);

        let error = reader.find(&Fingerprint::from_data(b"C")).unwrap_err();
        assert!(matches!(error, ArchiveError::Malformed { ref reason } if reason.contains("1 bytes")));
    }

    #[test]
    fn test_short_content_is_truncated() {
        // Declares 10 content bytes but carries 3
        let fingerprint = Fingerprint::from_data(b"0123456789");
        let mut payload = vec![0, 0, 0, 1];
        payload.extend_from_slice(fingerprint.as_bytes());
        payload.extend_from_slice(&10i64.to_be_bytes());
        payload.extend_from_slice(b"012");
        let reader = ArchiveReader::new(compress_zlib(&payload).unwrap());

        assert!(matches!(
            reader.find(&fingerprint),
            Err(ArchiveError::Truncated { .. })
        ));
        assert!(matches!(
            reader.find(&Fingerprint::from_data(b"other")),
            Err(ArchiveError::Truncated { .. })
        ));
    }

    #[test]
    fn test_negative_length_is_malformed() {
        let fingerprint = Fingerprint::from_data(b"x");
        let mut payload = vec![0, 0, 0, 1];
        payload.extend_from_slice(fingerprint.as_bytes());
        payload.extend_from_slice(&(-5i64).to_be_bytes());
        let reader = ArchiveReader::new(compress_zlib(&payload).unwrap());

        assert!(matches!(
            reader.find(&fingerprint),
            Err(ArchiveError::Malformed { .. })
        ));
    }

    #[test]
    fn test_missing_entries_are_truncated() {
        // Header claims three entries, stream holds one
        let fingerprint = Fingerprint::from_data(b"A");
        let mut payload = vec![0, 0, 0, 3];
        payload.extend_from_slice(fingerprint.as_bytes());
        payload.extend_from_slice(&1i64.to_be_bytes());
        payload.push(b'A');
        let reader = ArchiveReader::new(compress_zlib(&payload).unwrap());

        assert_eq!(&reader.find(&fingerprint).unwrap()[..], b"A");
        assert!(matches!(
            reader.find(&Fingerprint::from_data(b"B")),
            Err(ArchiveError::Truncated { ref context }) if context == "header of entry 1"
        ));
    }

    #[test]
    fn test_not_zlib_is_malformed() {
        let reader = ArchiveReader::new(vec![0x00, 0x11, 0x22, 0x33, 0x44]);
        assert!(matches!(
            reader.find(&Fingerprint::from_data(b"A")),
            Err(ArchiveError::Malformed { .. })
        ));
    }

    #[test]
    fn test_checksum_verification() {
        let mut builder = ArchiveBuilder::new();
        builder.add(b"A".to_vec());
        let built = builder.build().unwrap();
        let reader = ArchiveReader::new(built.data.clone());

        reader.verify_checksum(&built.checksum).unwrap();
        assert!(matches!(
            reader.verify_checksum(&Fingerprint::from_data(b"wrong")),
            Err(ArchiveError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_static_archive() {
        // zlib stream of a zero entry count
        static EMPTY: &[u8] = &[
            0x78, 0xda, 0x63, 0x60, 0x60, 0x60, 0x00, 0x00, 0x00, 0x04, 0x00, 0x01,
        ];
        let reader = ArchiveReader::from_static(EMPTY);
        assert_eq!(reader.entry_count().unwrap(), 0);
        assert!(reader.entries().unwrap().is_empty());
    }
}
