//! Chunk container builder

use chunkette_crypto::{RollingPoly64, ShaDigest};

use super::compression::compress_payload;
use super::error::{ChunkError, ChunkResult};
use super::flags::{HashKind, HashType, StorageFlags};
use super::header::{ChunkHeader, DEFAULT_UNCOMPRESSED_SIZE, LATEST_VERSION, fixed_header_size};
use crate::guid::Guid;

/// Builder for chunk wire containers
#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    guid: Guid,
    version: u32,
    compress: bool,
    hash_type: HashType,
}

impl ChunkBuilder {
    /// Create a builder for the latest version, uncompressed, both hashes
    pub fn new(guid: Guid) -> Self {
        Self {
            guid,
            version: LATEST_VERSION,
            compress: false,
            hash_type: HashType::both(),
        }
    }

    /// Set the header version
    ///
    /// Version 1 cannot record a hash type, so the hash type is reset to
    /// rolling-only.
    pub fn with_version(mut self, version: u32) -> ChunkResult<Self> {
        if !(1..=LATEST_VERSION).contains(&version) {
            return Err(ChunkError::InvalidChunk(format!(
                "version {version} is not between 1 and {LATEST_VERSION}"
            )));
        }
        self.version = version;
        if version < 2 {
            self.hash_type = HashType::rolling_only();
        }
        Ok(self)
    }

    /// Store the payload zlib compressed
    #[must_use]
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the hash kinds recorded as authoritative
    #[must_use]
    pub fn with_hash_type(mut self, hash_type: HashType) -> Self {
        self.hash_type = hash_type;
        self
    }

    /// Build the header and the stored payload bytes separately
    pub fn build_parts(&self, data: &[u8]) -> ChunkResult<(ChunkHeader, Vec<u8>)> {
        let uncompressed_size = u32::try_from(data.len()).map_err(|_| {
            ChunkError::InvalidChunk(format!("payload of {} bytes is too large", data.len()))
        })?;

        if self.version < 2 && self.hash_type != HashType::rolling_only() {
            return Err(ChunkError::InvalidChunk(
                "version 1 containers can only record the rolling hash".to_string(),
            ));
        }

        if self.version < 3 && self.compress && uncompressed_size != DEFAULT_UNCOMPRESSED_SIZE {
            return Err(ChunkError::InvalidChunk(format!(
                "version {} compressed payloads must be {DEFAULT_UNCOMPRESSED_SIZE} bytes, got {uncompressed_size}",
                self.version
            )));
        }

        let (stored, storage_flags) = if self.compress {
            (
                compress_payload(data)?,
                StorageFlags::new(StorageFlags::COMPRESSED),
            )
        } else {
            (data.to_vec(), StorageFlags::new(StorageFlags::NONE))
        };

        let compressed_size = u32::try_from(stored.len()).map_err(|_| {
            ChunkError::InvalidChunk(format!("stored payload of {} bytes is too large", stored.len()))
        })?;

        let header = ChunkHeader {
            version: self.version,
            header_size: fixed_header_size(self.version) as u32,
            compressed_size,
            guid: self.guid,
            rolling_hash: RollingPoly64::hash(data),
            storage_flags,
            sha_digest: if self.version >= 2 && self.hash_type.contains(HashKind::Sha1) {
                ShaDigest::from_data(data)
            } else {
                ShaDigest::default()
            },
            hash_type: self.hash_type,
            uncompressed_size: if self.version >= 3 {
                uncompressed_size
            } else {
                DEFAULT_UNCOMPRESSED_SIZE
            },
        };

        Ok((header, stored))
    }

    /// Build a complete wire container
    pub fn build(&self, data: &[u8]) -> ChunkResult<Vec<u8>> {
        let (header, stored) = self.build_parts(data)?;
        let mut container = header.to_bytes()?;
        container.extend_from_slice(&stored);
        Ok(container)
    }
}
