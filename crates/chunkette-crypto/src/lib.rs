//! Checksum primitives for chunk verification
//!
//! Chunk containers carry two independent integrity signals:
//!
//! - **Rolling hash**: a 64-bit polynomial rolling checksum, cheap to compute
//!   and used as the primary identity of a chunk in manifests and cache
//!   file names.
//! - **SHA-1 digest**: a 20-byte cryptographic digest stored alongside the
//!   rolling hash from container version 2 onwards.
//!
//! # Examples
//!
//! ## Rolling hash
//!
//! ```
//! use chunkette_crypto::rolling::RollingPoly64;
//!
//! let hash = RollingPoly64::hash(b"chunk payload");
//! println!("Rolling hash: {hash:016X}");
//! ```
//!
//! ## SHA-1 digest
//!
//! ```
//! use chunkette_crypto::sha::ShaDigest;
//!
//! let digest = ShaDigest::from_data(b"chunk payload");
//! println!("SHA-1: {digest}");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod rolling;
pub mod sha;

pub use error::CryptoError;
pub use rolling::RollingPoly64;
pub use sha::ShaDigest;
