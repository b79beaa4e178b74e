//! Chunk part resolution
//!
//! A [`ChunkPartResolver`] turns one [`ChunkReference`] into the bytes of
//! its window. It prefers the local cache, falls back to a single request
//! against the remote chunk store, and verifies whatever it returns unless
//! the configuration is in lazy mode.

use bytes::Bytes;
use chunkette_crypto::{RollingPoly64, ShaDigest};
use chunkette_formats::chunk::{ChunkError, ChunkHeader, HashKind};
use chunkette_formats::ChunkReference;
use reqwest::StatusCode;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::ChunkCache;
use crate::config::ResolverConfig;
use crate::error::{ProtocolError, Result};
use crate::transport::{ChunkTransport, HttpTransport};

/// Resolves one chunk reference into bytes
pub struct ChunkPartResolver {
    reference: ChunkReference,
    file_name: String,
    cache: Option<ChunkCache>,
    base_uri: Option<String>,
    verify: bool,
    transport: Arc<dyn ChunkTransport>,
}

impl ChunkPartResolver {
    /// Create a resolver using the shared HTTP transport
    pub fn new(reference: ChunkReference, config: &ResolverConfig) -> Result<Self> {
        Self::with_transport(reference, config, Arc::new(HttpTransport::new()?))
    }

    /// Create a resolver with an injected transport
    ///
    /// Fails before any I/O when the configuration names no chunk source.
    pub fn with_transport(
        reference: ChunkReference,
        config: &ResolverConfig,
        transport: Arc<dyn ChunkTransport>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            file_name: reference.file_name(),
            reference,
            cache: config.cache_dir.as_ref().map(ChunkCache::new),
            base_uri: config.base_uri.clone(),
            verify: config.verify(),
            transport,
        })
    }

    /// Cache and remote file name of the chunk
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Cache path of the chunk, when a cache directory is configured
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache
            .as_ref()
            .map(|cache| cache.path_for(&self.file_name))
    }

    /// Remote URL of the chunk, when a base URI is configured
    pub fn remote_url(&self) -> Option<String> {
        self.base_uri.as_ref().map(|base| {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                self.reference.remote_path()
            )
        })
    }

    /// Fetch the referenced window
    ///
    /// Reads the cache if it holds the chunk, otherwise performs exactly one
    /// request and caches the verified payload. The returned buffer is
    /// exactly `reference.size` bytes long.
    pub async fn fetch_bytes(self) -> Result<Bytes> {
        let payload = match self.read_cached().await? {
            Some(payload) => payload,
            None => self.fetch_remote().await?,
        };

        self.slice(payload)
    }

    async fn read_cached(&self) -> Result<Option<Vec<u8>>> {
        let Some(cache) = &self.cache else {
            return Ok(None);
        };

        let Some(data) = cache.read(&self.file_name).await? else {
            tracing::debug!(file = %self.file_name, "chunk cache miss");
            return Ok(None);
        };

        tracing::debug!(file = %self.file_name, bytes = data.len(), "chunk cache hit");

        if self.verify {
            self.verify_cached(&data)?;
        }

        Ok(Some(data))
    }

    /// Check raw cached bytes against the hashes the manifest expects
    fn verify_cached(&self, data: &[u8]) -> Result<()> {
        let actual = RollingPoly64::hash(data);
        if actual != self.reference.rolling_hash {
            return Err(ProtocolError::CorruptedCacheEntry {
                file_name: self.file_name.clone(),
                kind: HashKind::Rolling,
                expected: format!("{:016X}", self.reference.rolling_hash),
                actual: format!("{actual:016X}"),
            });
        }

        let expected = self
            .reference
            .sha_digest
            .ok_or_else(|| ProtocolError::MissingExpectedDigest(self.file_name.clone()))?;
        let actual = ShaDigest::from_data(data);
        if actual != expected {
            return Err(ProtocolError::CorruptedCacheEntry {
                file_name: self.file_name.clone(),
                kind: HashKind::Sha1,
                expected: expected.to_hex(),
                actual: actual.to_hex(),
            });
        }

        Ok(())
    }

    async fn fetch_remote(&self) -> Result<Vec<u8>> {
        let url = self
            .remote_url()
            .ok_or_else(|| ProtocolError::MissingBaseUri(self.file_name.clone()))?;

        let response = self.transport.get(&url).await?;
        if response.status != StatusCode::OK {
            return Err(ProtocolError::HttpStatus {
                url,
                status: response.status,
            });
        }

        let payload = self
            .decode_container(&response.body)
            .map_err(|source| ProtocolError::Chunk {
                file_name: self.file_name.clone(),
                source,
            })?;

        if let Some(cache) = &self.cache {
            match cache.write(&self.file_name, &payload).await {
                Ok(()) => tracing::debug!(file = %self.file_name, "chunk cached"),
                Err(e) => tracing::warn!(
                    file = %self.file_name,
                    error = %e,
                    "failed to persist chunk to cache"
                ),
            }
        }

        Ok(payload)
    }

    fn decode_container(&self, body: &[u8]) -> std::result::Result<Vec<u8>, ChunkError> {
        let (header, payload) = ChunkHeader::load_container(body, self.verify)?;
        tracing::trace!(
            file = %self.file_name,
            version = header.version,
            compressed = header.storage_flags.is_compressed(),
            "decoded chunk container"
        );
        Ok(payload)
    }

    fn slice(&self, payload: Vec<u8>) -> Result<Bytes> {
        let start = self.reference.offset as usize;
        let end = start
            .checked_add(self.reference.size as usize)
            .filter(|end| *end <= payload.len())
            .ok_or_else(|| ProtocolError::RangeOutOfBounds {
                file_name: self.file_name.clone(),
                offset: u64::from(self.reference.offset),
                size: u64::from(self.reference.size),
                len: payload.len(),
            })?;

        Ok(Bytes::from(payload).slice(start..end))
    }
}
