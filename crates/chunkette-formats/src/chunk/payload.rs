//! Payload loading and verification for decoded chunk headers

use binrw::io::{Read, Seek, SeekFrom};
use chunkette_crypto::{RollingPoly64, ShaDigest};

use super::compression::decompress_payload;
use super::error::{ChunkError, ChunkResult};
use super::flags::HashKind;
use super::header::ChunkHeader;

impl ChunkHeader {
    /// Read, decompress and verify the payload that follows this header
    ///
    /// The reader must be positioned at the first payload byte, which is
    /// where [`ChunkHeader::decode`] leaves it. Checks run in a fixed order
    /// and the first failure wins:
    ///
    /// 1. invalid GUID
    /// 2. missing hash information (only when verifying)
    /// 3. compressed size larger than the remaining input
    /// 4. encrypted storage
    /// 5. decompressed length mismatch
    /// 6. hash mismatches, rolling before SHA-1 (only when verifying)
    pub fn load<R: Read + Seek>(&self, reader: &mut R, verify: bool) -> ChunkResult<Vec<u8>> {
        if !self.guid.is_valid() {
            return Err(ChunkError::CorruptHeader(format!(
                "invalid GUID {}",
                self.guid
            )));
        }

        if verify && self.hash_type.is_empty() {
            return Err(ChunkError::MissingHashInfo);
        }

        let position = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(position))?;

        let available = end.saturating_sub(position);
        if u64::from(self.compressed_size) > available {
            return Err(ChunkError::IncorrectFileSize {
                expected: u64::from(self.compressed_size),
                available,
            });
        }

        if self.storage_flags.is_encrypted() {
            return Err(ChunkError::UnsupportedStorage(self.storage_flags.value));
        }

        let mut stored = vec![0u8; self.compressed_size as usize];
        reader.read_exact(&mut stored)?;

        let payload = if self.storage_flags.is_compressed() {
            decompress_payload(&stored, self.uncompressed_size as usize)?
        } else {
            stored
        };

        if verify {
            self.verify_payload(&payload)?;
        }

        Ok(payload)
    }

    /// Load the payload from a complete wire container held in memory
    pub fn load_container(data: &[u8], verify: bool) -> ChunkResult<(Self, Vec<u8>)> {
        let mut cursor = binrw::io::Cursor::new(data);
        let header = Self::decode(&mut cursor, verify)?;
        let payload = header.load(&mut cursor, verify)?;
        Ok((header, payload))
    }

    /// Check a payload against every hash kind this header vouches for
    ///
    /// Every recorded kind is computed even after an earlier one mismatched;
    /// the first mismatch in verification order is reported.
    pub fn verify_payload(&self, payload: &[u8]) -> ChunkResult<()> {
        let mut failure = None;

        for kind in self.hash_type.kinds() {
            let (expected, actual) = match kind {
                HashKind::Rolling => (
                    format!("{:016X}", self.rolling_hash),
                    format!("{:016X}", RollingPoly64::hash(payload)),
                ),
                HashKind::Sha1 => (
                    self.sha_digest.to_hex(),
                    ShaDigest::from_data(payload).to_hex(),
                ),
            };

            if expected != actual {
                tracing::debug!(%kind, %expected, %actual, guid = %self.guid, "chunk hash mismatch");
                failure.get_or_insert(ChunkError::HashCheckFailed {
                    kind,
                    expected,
                    actual,
                });
            }
        }

        failure.map_or(Ok(()), Err)
    }
}
