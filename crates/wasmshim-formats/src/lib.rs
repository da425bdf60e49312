//! Shim archive container and bundle manifest formats
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Format terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! This crate provides symmetric (reader and builder) implementations of the
//! files a wasmshim bundle is made of.
//!
//! # Supported Formats
//!
//! - **Archive**: zlib-compressed container of content-addressed shim variants
//! - **Manifest**: JSON version table mapping toolchain versions to fingerprints
//!
//! # Design Principles
//!
//! - **Deterministic Output**: the same inputs always build the same bytes
//! - **Incremental Decoding**: lookups decompress only as far as needed
//! - **Typed Errors**: truncation, malformation and misses are distinct

#![warn(missing_docs)]

pub mod archive;
pub mod manifest;

pub use archive::{ArchiveBuilder, ArchiveEntry, ArchiveError, ArchiveReader, BuiltArchive};
pub use manifest::{ARCHIVE_FILE_NAME, BundleManifest, MANIFEST_FILE_NAME, ManifestError};
