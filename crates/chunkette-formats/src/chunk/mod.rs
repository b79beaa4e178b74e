//! Chunk container format
//!
//! A chunk container is a versioned header followed by the payload, stored
//! either verbatim or zlib compressed. The header records the chunk GUID,
//! a rolling hash and (from version 2) a SHA-1 digest of the uncompressed
//! payload.
//!
//! # Features
//!
//! - Defensive header decoding across versions 1-4
//! - Lazy decoding that skips hash-bearing fields
//! - Payload decompression with exact length checks
//! - Rolling hash and SHA-1 verification
//! - Builder for producing containers

mod builder;
mod compression;
mod error;
mod flags;
mod header;
mod payload;

pub use builder::ChunkBuilder;
pub use compression::{MAX_DECOMPRESSION_SIZE, compress_payload, decompress_payload};
pub use error::{ChunkError, ChunkResult};
pub use flags::{HashKind, HashType, StorageFlags};
pub use header::{
    CHUNK_MAGIC, ChunkHeader, DEFAULT_UNCOMPRESSED_SIZE, LATEST_VERSION, V1_HEADER_SIZE,
    fixed_header_size,
};
