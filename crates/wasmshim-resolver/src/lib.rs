//! Version-specific `wasm_exec.js` lookup
//!
//! Every toolchain release ships its own JavaScript shim, and a compiled
//! WebAssembly module only runs against the shim of the toolchain that built
//! it. This crate maps a version identifier to that shim using an embedded
//! archive and a version table.
//!
//! # Architecture
//!
//! ```text
//! version ──► LookupTable ──► Fingerprint ──► ShimSource ──► bytes
//!                                  │                            │
//!                                  └──────── re-hash ◄──────────┘
//!                                                │
//!                                          ContentCache
//! ```
//!
//! # Examples
//!
//! ```
//! use wasmshim_formats::{ArchiveBuilder, ArchiveReader};
//! use wasmshim_resolver::ShimBundle;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut builder = ArchiveBuilder::new();
//! let fingerprint = builder.add(b"// shim".to_vec());
//! let archive = ArchiveReader::new(builder.build()?.data);
//!
//! let table = [("go1.22.0", fingerprint)].into_iter().collect();
//! let resolver = ShimBundle::new(table, archive).into_resolver("go1.22.0");
//!
//! assert_eq!(&resolver.content("go1.22.0")?[..], b"// shim");
//! assert!(resolver.content("go1.0").is_err());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod bundle;
pub mod cache;
pub mod error;
pub mod resolver;
pub mod source;
pub mod table;

pub use bundle::{BundleReport, ShimBundle};
pub use cache::{CacheStats, ContentCache};
pub use error::{BundleError, ResolveError, ResolveResult};
pub use resolver::VersionResolver;
pub use source::ShimSource;
pub use table::LookupTable;
