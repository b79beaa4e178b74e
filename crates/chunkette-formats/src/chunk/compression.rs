//! Chunk payload compression and decompression

use flate2::Compression;
use flate2::read::{ZlibDecoder, ZlibEncoder};
use std::io::Read;

use super::error::{ChunkError, ChunkResult};

/// Maximum allowed decompression size (1 GB)
///
/// Bounds the allocation a crafted header can request through its
/// uncompressed size field.
pub const MAX_DECOMPRESSION_SIZE: usize = 1024 * 1024 * 1024;

/// Compress a payload with zlib
pub fn compress_payload(data: &[u8]) -> ChunkResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(data, Compression::default());
    let mut compressed = Vec::new();
    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| ChunkError::CompressionError(format!("ZLib compression failed: {e}")))?;
    Ok(compressed)
}

/// Inflate a zlib payload that must produce exactly `expected_size` bytes
///
/// Output is capped at `expected_size + 1` bytes so an overlong stream is
/// detected without inflating all of it.
pub fn decompress_payload(data: &[u8], expected_size: usize) -> ChunkResult<Vec<u8>> {
    if expected_size > MAX_DECOMPRESSION_SIZE {
        return Err(ChunkError::DecompressFailure(format!(
            "uncompressed size {expected_size} exceeds limit of {MAX_DECOMPRESSION_SIZE} bytes"
        )));
    }

    let mut decoder = ZlibDecoder::new(data).take(expected_size as u64 + 1);
    let mut decompressed = Vec::with_capacity(expected_size);
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| ChunkError::DecompressFailure(format!("ZLib decompression failed: {e}")))?;

    if decompressed.len() > expected_size {
        return Err(ChunkError::DecompressFailure(format!(
            "expected {expected_size} bytes, payload inflates past that"
        )));
    }

    if decompressed.len() != expected_size {
        return Err(ChunkError::DecompressFailure(format!(
            "expected {expected_size} bytes, got {}",
            decompressed.len()
        )));
    }

    Ok(decompressed)
}
