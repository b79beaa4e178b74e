//! Error types for chunk resolution

use chunkette_formats::chunk::{ChunkError, HashKind};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("No remote base URI configured to fetch {0}")]
    MissingBaseUri(String),

    #[error("Chunk {file_name}: {source}")]
    Chunk {
        file_name: String,
        #[source]
        source: ChunkError,
    },

    #[error("Corrupted cache entry {file_name}: {kind} expected {expected}, got {actual}")]
    CorruptedCacheEntry {
        file_name: String,
        kind: HashKind,
        expected: String,
        actual: String,
    },

    #[error("No expected SHA-1 digest for {0} while verification is enabled")]
    MissingExpectedDigest(String),

    #[error("Range {offset}+{size} is outside the {len} byte payload of {file_name}")]
    RangeOutOfBounds {
        file_name: String,
        offset: u64,
        size: u64,
        len: usize,
    },
}

impl ProtocolError {
    /// Chunk format error behind this failure, if any
    pub fn chunk_error(&self) -> Option<&ChunkError> {
        match self {
            Self::Chunk { source, .. } => Some(source),
            _ => None,
        }
    }

    /// HTTP status behind this failure, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
