//! Content fingerprints for the wasmshim archive
//!
//! Every shim variant stored in a wasmshim archive is addressed by the
//! SHA-256 hash of its bytes. This crate provides that key type together
//! with hex and binary encodings.
//!
//! # Examples
//!
//! ```
//! use wasmshim_crypto::Fingerprint;
//!
//! let fingerprint = Fingerprint::from_data(b"console.log('hi')");
//! assert!(fingerprint.matches(b"console.log('hi')"));
//! println!("Fingerprint: {}", fingerprint);
//! ```

#![warn(missing_docs)]

pub mod fingerprint;

pub use fingerprint::{FINGERPRINT_SIZE, Fingerprint};
