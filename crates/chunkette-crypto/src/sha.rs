//! SHA-1 digests stored in chunk headers

use binrw::{BinRead, BinWrite};
use sha1::{Digest, Sha1};
use std::fmt;

use crate::error::CryptoError;

/// Size of a SHA-1 digest in bytes
pub const SHA_DIGEST_SIZE: usize = 20;

/// SHA-1 digest of a chunk payload
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ShaDigest([u8; SHA_DIGEST_SIZE]);

impl ShaDigest {
    /// Create digest from raw bytes
    pub const fn from_bytes(bytes: [u8; SHA_DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create digest by hashing data
    pub fn from_data(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        let result = hasher.finalize();
        let mut bytes = [0u8; SHA_DIGEST_SIZE];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }

    /// Create digest from a byte slice of exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SHA_DIGEST_SIZE] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidDigestSize {
                    expected: SHA_DIGEST_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Parse digest from hex string
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let mut bytes = [0u8; SHA_DIGEST_SIZE];
        hex::decode_to_slice(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get raw bytes
    pub const fn as_bytes(&self) -> &[u8; SHA_DIGEST_SIZE] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check whether every byte is zero (no digest recorded)
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for ShaDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
