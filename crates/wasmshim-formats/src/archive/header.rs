//! Fixed-size records of the decompressed archive stream
//!
//! Both records are big-endian:
//! - archive header: 4-byte entry count
//! - entry header: 32-byte fingerprint followed by an 8-byte signed length

use crate::archive::error::{ArchiveError, ArchiveResult};
use binrw::{BinRead, BinWrite};
use std::io::{Cursor, Read};
use wasmshim_crypto::Fingerprint;

/// Archive header: number of entries that follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct ArchiveHeader {
    /// Number of entries in the archive
    pub entry_count: u32,
}

impl ArchiveHeader {
    /// Encoded size in bytes
    pub const SIZE: usize = 4;

    /// Read the header from a decompressed stream
    pub fn read_from<R: Read>(reader: &mut R) -> ArchiveResult<Self> {
        let buf: [u8; Self::SIZE] = read_fixed(reader, "entry count")?;
        Ok(Self::read(&mut Cursor::new(buf))?)
    }
}

/// Entry header preceding each content blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(big)]
pub struct EntryHeader {
    /// Fingerprint the builder recorded for the content
    pub fingerprint: Fingerprint,
    /// Content length in bytes, signed on the wire
    pub length: i64,
}

impl EntryHeader {
    /// Encoded size in bytes
    pub const SIZE: usize = 40;

    /// Read the header of entry `index` from a decompressed stream
    pub fn read_from<R: Read>(reader: &mut R, index: u32) -> ArchiveResult<Self> {
        let buf: [u8; Self::SIZE] = read_fixed(reader, &format!("header of entry {index}"))?;
        Ok(Self::read(&mut Cursor::new(buf))?)
    }

    /// Content length, rejecting negative values
    pub fn content_length(&self) -> ArchiveResult<u64> {
        u64::try_from(self.length).map_err(|_| {
            ArchiveError::malformed(format!(
                "negative content length {} for {}",
                self.length, self.fingerprint
            ))
        })
    }
}

fn read_fixed<R: Read, const N: usize>(reader: &mut R, context: &str) -> ArchiveResult<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|e| ArchiveError::from_read(&e, context))?;
    Ok(buf)
}
