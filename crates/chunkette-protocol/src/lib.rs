//! # chunkette-protocol - Chunk part resolution
//!
//! This crate turns a manifest reference to a byte window of a chunk into
//! the bytes themselves. Chunks come from a local cache directory when
//! present, otherwise from one request against a remote chunk store.
//!
//! ## Resolution Flow
//!
//! 1. **Cache lookup**: `{cache_dir}/{rolling_hash:016X}_{guid}.chunk`
//!    holds the uncompressed payload of a previously fetched chunk
//! 2. **Remote fetch**: `{base_uri}/{group:02}/{file_name}` returns the full
//!    chunk container, which is decoded, inflated and verified
//! 3. **Persist**: the verified payload is written back to the cache with
//!    an atomic rename
//! 4. **Slice**: exactly `size` bytes starting at `offset` are returned
//!
//! Unless the resolver runs in lazy mode, cached payloads are checked
//! against the expected rolling hash and SHA-1 before use, and a corrupted
//! entry is reported instead of silently refetched.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chunkette_formats::{ChunkInfo, ChunkReference};
//! use chunkette_protocol::{ChunkPartResolver, ResolverConfig};
//!
//! # async fn example(info: ChunkInfo) -> Result<(), Box<dyn std::error::Error>> {
//! let config = ResolverConfig::default()
//!     .with_cache_dir("/var/cache/chunks")
//!     .with_base_uri("https://cdn.example.com/Chunks");
//!
//! let reference = ChunkReference::from_info(&info, 0, 4096, config.verify());
//! let bytes = ChunkPartResolver::new(reference, &config)?
//!     .fetch_bytes()
//!     .await?;
//!
//! assert_eq!(bytes.len(), 4096);
//! # Ok(())
//! # }
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod error;
pub mod resolver;
pub mod transport;

pub use cache::ChunkCache;
pub use config::{HttpConfig, ResolverConfig};
pub use error::{ProtocolError, Result};
pub use resolver::ChunkPartResolver;
pub use transport::{ChunkTransport, HttpTransport, TransportResponse};
