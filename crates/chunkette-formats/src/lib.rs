//! Chunk container format and manifest references
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! This crate provides the parser and builder for chunk containers, the
//! self-describing unit a content-delivery client fetches from a chunk store
//! or reads back from its local cache.
//!
//! # Supported Formats
//!
//! - **Chunk containers**: versioned header plus verbatim or zlib payload,
//!   header versions 1 through 4
//! - **Manifest references**: the GUID, expected hashes and data group a
//!   manifest supplies for a chunk, plus the byte window a caller wants
//!
//! # Design Principles
//!
//! - **Defensive Parsing**: truncated or malformed headers fail, they never
//!   produce a partially filled header
//! - **Symmetric Operations**: containers can be built as well as parsed
//! - **Round-Trip Guarantee**: parse(build(data)) == data

#![warn(missing_docs)]

pub mod chunk;
/// 128-bit chunk identifiers
pub mod guid;
pub mod manifest;

pub use chunk::{ChunkBuilder, ChunkError, ChunkHeader, ChunkResult};
pub use guid::Guid;
pub use manifest::{ChunkInfo, ChunkManifest, ChunkReference, InMemoryManifest};
