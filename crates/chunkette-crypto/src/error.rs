//! Error types for checksum operations

use thiserror::Error;

/// Errors that can occur while handling digests
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid digest size
    #[error("Invalid digest size: expected {expected}, got {actual}")]
    InvalidDigestSize {
        /// Expected digest size in bytes
        expected: usize,
        /// Actual digest size in bytes
        actual: usize,
    },

    /// Digest hex string could not be decoded
    #[error("Invalid digest hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
