//! Manifest lookups and chunk part references
//!
//! A manifest knows, for every chunk GUID, the expected rolling hash, the
//! expected SHA-1 digest and the data group the chunk lives under on the
//! remote store. A [`ChunkReference`] combines that with the byte window a
//! caller wants from the chunk.

use chunkette_crypto::ShaDigest;
use std::collections::HashMap;

use crate::guid::Guid;

/// Per-chunk metadata supplied by a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    /// Chunk identity
    pub guid: Guid,
    /// Expected rolling hash of the uncompressed payload
    pub rolling_hash: u64,
    /// Expected SHA-1 of the uncompressed payload
    pub sha_digest: ShaDigest,
    /// Remote storage group (0-99)
    pub group: u8,
}

/// Source of per-chunk metadata
pub trait ChunkManifest {
    /// Look up the metadata for a chunk
    fn chunk_info(&self, guid: &Guid) -> Option<&ChunkInfo>;
}

/// Manifest backed by a hash map
#[derive(Debug, Clone, Default)]
pub struct InMemoryManifest {
    chunks: HashMap<Guid, ChunkInfo>,
}

impl InMemoryManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a chunk entry
    pub fn insert(&mut self, info: ChunkInfo) -> Option<ChunkInfo> {
        self.chunks.insert(info.guid, info)
    }

    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the manifest has no chunks
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl ChunkManifest for InMemoryManifest {
    fn chunk_info(&self, guid: &Guid) -> Option<&ChunkInfo> {
        self.chunks.get(guid)
    }
}

impl FromIterator<ChunkInfo> for InMemoryManifest {
    fn from_iter<I: IntoIterator<Item = ChunkInfo>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().map(|info| (info.guid, info)).collect(),
        }
    }
}

/// A byte window within one chunk's uncompressed payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReference {
    /// Chunk identity
    pub guid: Guid,
    /// Window start within the uncompressed payload
    pub offset: u32,
    /// Window length
    pub size: u32,
    /// Expected rolling hash
    pub rolling_hash: u64,
    /// Expected SHA-1, absent when verification is disabled
    pub sha_digest: Option<ShaDigest>,
    /// Remote storage group
    pub group: u8,
}

impl ChunkReference {
    /// Build a reference from manifest metadata
    ///
    /// The SHA-1 digest is only carried when `verify` is set.
    pub fn from_info(info: &ChunkInfo, offset: u32, size: u32, verify: bool) -> Self {
        Self {
            guid: info.guid,
            offset,
            size,
            rolling_hash: info.rolling_hash,
            sha_digest: verify.then_some(info.sha_digest),
            group: info.group,
        }
    }

    /// Look a chunk up in a manifest and build a reference to a window of it
    pub fn from_manifest<M: ChunkManifest + ?Sized>(
        manifest: &M,
        guid: &Guid,
        offset: u32,
        size: u32,
        verify: bool,
    ) -> Option<Self> {
        manifest
            .chunk_info(guid)
            .map(|info| Self::from_info(info, offset, size, verify))
    }

    /// Cache and remote file name: `{rolling_hash:016X}_{guid}.chunk`
    pub fn file_name(&self) -> String {
        format!("{:016X}_{}.chunk", self.rolling_hash, self.guid)
    }

    /// Path below the remote base: `{group:02}/{file_name}`
    pub fn remote_path(&self) -> String {
        format!("{:02}/{}", self.group, self.file_name())
    }
}
