//! Chunk container error types

use thiserror::Error;

use super::flags::HashKind;

/// Chunk-specific error type
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Magic sentinel mismatch
    #[error("invalid chunk magic: expected 0x{expected:08X}, got 0x{actual:08X}")]
    InvalidMagic {
        /// Expected sentinel
        expected: u32,
        /// Sentinel found on the wire
        actual: u32,
    },

    /// Bytes consumed while decoding differ from the version's fixed size
    #[error("header size mismatch: expected {expected} bytes, consumed {actual}")]
    HeaderSizeMismatch {
        /// Fixed byte count implied by the header version
        expected: u64,
        /// Bytes actually consumed
        actual: u64,
    },

    /// Header is structurally unusable (truncated, unknown version, invalid GUID)
    #[error("corrupt chunk header: {0}")]
    CorruptHeader(String),

    /// Verification requested but the header records no hash type
    #[error("chunk header has no hash information")]
    MissingHashInfo,

    /// Advertised compressed size exceeds the bytes available
    #[error("incorrect file size: header advertises {expected} bytes, {available} available")]
    IncorrectFileSize {
        /// Advertised compressed size
        expected: u64,
        /// Bytes remaining after the header
        available: u64,
    },

    /// Storage mode this crate does not implement
    #[error("unsupported storage flags: 0x{0:02X}")]
    UnsupportedStorage(u8),

    /// Inflation failed or produced the wrong length
    #[error("decompression failed: {0}")]
    DecompressFailure(String),

    /// Recomputed hash differs from the stored value
    #[error("{kind} check failed: expected {expected}, got {actual}")]
    HashCheckFailed {
        /// Which hash failed
        kind: HashKind,
        /// Stored value (hex)
        expected: String,
        /// Recomputed value (hex)
        actual: String,
    },

    /// GUID text could not be parsed
    #[error("invalid GUID: {0}")]
    InvalidGuid(String),

    /// Builder input cannot be encoded
    #[error("invalid chunk: {0}")]
    InvalidChunk(String),

    /// Compression error
    #[error("compression error: {0}")]
    CompressionError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl ChunkError {
    /// Check if this is a header format error
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic { .. } | Self::HeaderSizeMismatch { .. } | Self::CorruptHeader(_)
        )
    }

    /// Check if this is an integrity error (payload must be discarded)
    pub const fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            Self::DecompressFailure(_) | Self::HashCheckFailed { .. }
        )
    }
}

/// Result type for chunk operations
pub type ChunkResult<T> = Result<T, ChunkError>;
