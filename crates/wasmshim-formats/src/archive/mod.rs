//! Shim archive container format
//!
//! A shim archive bundles every historical variant of a shim file in one
//! zlib stream. Variants are addressed by the SHA-256 fingerprint of their
//! content, and each distinct content is stored once.
//!
//! # Format Structure
//!
//! ```text
//! Archive (zlib-compressed, maximum level):
//! ├── Entry count (4 bytes, big-endian u32)
//! └── Entries × count
//!     ├── Fingerprint (32 bytes, SHA-256 of content)
//!     ├── Length (8 bytes, big-endian i64)
//!     └── Content (length bytes)
//! ```
//!
//! # Key Characteristics
//!
//! - **Big-Endian Records**: count and lengths are big-endian
//! - **Sorted Entries**: the builder writes entries in fingerprint order; the
//!   reader scans linearly and does not depend on it
//! - **Early Exit**: lookups stop decompressing at the matching entry
//! - **Clean End Required**: a full scan that misses checks that nothing
//!   follows the declared entries
//!
//! # Usage Examples
//!
//! ```rust
//! use wasmshim_formats::archive::{ArchiveBuilder, ArchiveReader};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = ArchiveBuilder::new();
//! let fingerprint = builder.add(b"\"use strict\";".to_vec());
//! let built = builder.build()?;
//!
//! let reader = ArchiveReader::new(built.data);
//! reader.verify_checksum(&built.checksum)?;
//! assert_eq!(&reader.find(&fingerprint)?[..], b"\"use strict\";");
//! # Ok(())
//! # }
//! ```

mod builder;
mod entry;
mod error;
mod header;
mod reader;
mod stream;

pub use builder::{ArchiveBuilder, BuiltArchive, compress_zlib};
pub use entry::ArchiveEntry;
pub use error::{ArchiveError, ArchiveResult};
pub use header::{ArchiveHeader, EntryHeader};
pub use reader::ArchiveReader;
pub use stream::InflateStream;
