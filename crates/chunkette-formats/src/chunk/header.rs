//! Chunk container header structures and parsing
//!
//! The header grew over time. Every version starts with the same v1 block
//! and later versions append field sets:
//!
//! | Version | Adds                               | Fixed size |
//! |---------|------------------------------------|------------|
//! | 1       | magic .. storage flags             | 41         |
//! | 2       | SHA-1 digest, hash type            | 62         |
//! | 3       | uncompressed size                  | 66         |
//! | 4       | nothing (shares the v3 layout)     | 66         |
//!
//! All integers are little-endian. Readers must seek to
//! `start + header_size` before reading the payload; the advertised size may
//! cover fields this parser does not know about.

use binrw::io::{Cursor, Read, Seek, SeekFrom, Write};
use binrw::{BinRead, BinResult, BinWrite};
use chunkette_crypto::ShaDigest;
use chunkette_crypto::sha::SHA_DIGEST_SIZE;

use super::error::{ChunkError, ChunkResult};
use super::flags::{HashType, StorageFlags};
use crate::guid::Guid;

/// Chunk container magic sentinel
pub const CHUNK_MAGIC: u32 = 0xB1FE_3AA2;

/// Newest header version this crate writes
pub const LATEST_VERSION: u32 = 4;

/// Size of the v1 field block in bytes
pub const V1_HEADER_SIZE: u64 = 41;

/// Uncompressed size assumed for containers older than version 3 (1 MiB)
pub const DEFAULT_UNCOMPRESSED_SIZE: u32 = 1024 * 1024;

/// Largest optional field set, in bytes
const MAX_FIELD_SET_WIDTH: usize = SHA_DIGEST_SIZE + 1;

/// A group of fields appended by a given header version
struct FieldSet {
    /// First version carrying these fields
    min_version: u32,
    /// Bytes on the wire
    width: u64,
    /// Skipped rather than decoded when verification is off
    hash_bearing: bool,
    /// Decode the set from exactly `width` bytes
    decode: fn(&[u8], &mut ChunkHeader) -> BinResult<()>,
}

/// Optional field sets in wire order
const FIELD_SETS: [FieldSet; 2] = [
    FieldSet {
        min_version: 2,
        width: (SHA_DIGEST_SIZE + 1) as u64,
        hash_bearing: true,
        decode: decode_hash_fields,
    },
    FieldSet {
        min_version: 3,
        width: 4,
        hash_bearing: false,
        decode: decode_uncompressed_size,
    },
];

fn decode_hash_fields(bytes: &[u8], header: &mut ChunkHeader) -> BinResult<()> {
    let mut cursor = Cursor::new(bytes);
    header.sha_digest = ShaDigest::read_le(&mut cursor)?;
    header.hash_type = HashType::new(u8::read_le(&mut cursor)?);
    Ok(())
}

fn decode_uncompressed_size(bytes: &[u8], header: &mut ChunkHeader) -> BinResult<()> {
    header.uncompressed_size = u32::read_le(&mut Cursor::new(bytes))?;
    Ok(())
}

/// Fixed header size implied by a version
///
/// Versions newer than [`LATEST_VERSION`] are sized like the latest known
/// layout; anything they append is skipped through `header_size`.
pub fn fixed_header_size(version: u32) -> u64 {
    V1_HEADER_SIZE
        + FIELD_SETS
            .iter()
            .filter(|set| version >= set.min_version)
            .map(|set| set.width)
            .sum::<u64>()
}

/// Chunk container header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Header version
    pub version: u32,
    /// Total header length, payload starts at `start + header_size`
    pub header_size: u32,
    /// Stored payload length
    pub compressed_size: u32,
    /// Chunk identity
    pub guid: Guid,
    /// Rolling hash of the uncompressed payload (zero when not decoded)
    pub rolling_hash: u64,
    /// Storage flags
    pub storage_flags: StorageFlags,
    /// SHA-1 of the uncompressed payload (zero when absent or not decoded)
    pub sha_digest: ShaDigest,
    /// Authoritative hash kinds
    pub hash_type: HashType,
    /// Payload length after decompression
    pub uncompressed_size: u32,
}

impl Default for ChunkHeader {
    fn default() -> Self {
        Self::new(Guid::default())
    }
}

impl ChunkHeader {
    /// Create a latest-version header with default field values
    pub fn new(guid: Guid) -> Self {
        Self {
            version: LATEST_VERSION,
            header_size: fixed_header_size(LATEST_VERSION) as u32,
            compressed_size: 0,
            guid,
            rolling_hash: 0,
            storage_flags: StorageFlags::default(),
            sha_digest: ShaDigest::default(),
            hash_type: HashType::default(),
            uncompressed_size: DEFAULT_UNCOMPRESSED_SIZE,
        }
    }

    /// Decode a header from the reader's current position
    ///
    /// With `verify` off the rolling hash, SHA-1 digest and hash type are
    /// skipped on the wire and keep their defaults. On success the reader
    /// is left at the first payload byte. On failure no header is produced.
    pub fn decode<R: Read + Seek>(reader: &mut R, verify: bool) -> ChunkResult<Self> {
        let start = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(start))?;

        let available = end.saturating_sub(start);
        if available < V1_HEADER_SIZE {
            return Err(ChunkError::CorruptHeader(format!(
                "{available} bytes available, at least {V1_HEADER_SIZE} required"
            )));
        }

        let magic = u32::read_le(reader)?;
        let version = u32::read_le(reader)?;
        let header_size = u32::read_le(reader)?;
        let compressed_size = u32::read_le(reader)?;
        let guid = Guid::read_le(reader)?;
        let rolling_hash = if verify {
            u64::read_le(reader)?
        } else {
            reader.seek(SeekFrom::Current(8))?;
            0
        };
        let storage_flags = StorageFlags::new(u8::read_le(reader)?);

        let mut header = Self {
            version,
            header_size,
            compressed_size,
            guid,
            rolling_hash,
            storage_flags,
            sha_digest: ShaDigest::default(),
            hash_type: HashType::default(),
            uncompressed_size: DEFAULT_UNCOMPRESSED_SIZE,
        };

        let mut buffer = [0u8; MAX_FIELD_SET_WIDTH];
        for set in &FIELD_SETS {
            let remaining = end.saturating_sub(reader.stream_position()?);
            if version < set.min_version || remaining < set.width {
                break;
            }

            if set.hash_bearing && !verify {
                reader.seek(SeekFrom::Current(set.width as i64))?;
            } else {
                let bytes = &mut buffer[..set.width as usize];
                reader.read_exact(bytes)?;
                (set.decode)(bytes, &mut header)?;
            }
        }

        let consumed = reader.stream_position()? - start;

        if magic != CHUNK_MAGIC {
            return Err(ChunkError::InvalidMagic {
                expected: CHUNK_MAGIC,
                actual: magic,
            });
        }

        if version == 0 {
            return Err(ChunkError::CorruptHeader("unsupported version 0".to_string()));
        }

        let expected = fixed_header_size(version);
        if consumed != expected {
            return Err(ChunkError::HeaderSizeMismatch {
                expected,
                actual: consumed,
            });
        }

        let payload_start = start + u64::from(header_size);
        if u64::from(header_size) < consumed {
            return Err(ChunkError::CorruptHeader(format!(
                "advertised header size {header_size} is smaller than {consumed} decoded bytes"
            )));
        }
        if payload_start > end {
            return Err(ChunkError::CorruptHeader(format!(
                "advertised header size {header_size} exceeds {available} available bytes"
            )));
        }

        if start + consumed != payload_start {
            reader.seek(SeekFrom::Start(payload_start))?;
        }

        Ok(header)
    }

    /// Decode a header from the start of a byte slice
    pub fn parse(data: &[u8], verify: bool) -> ChunkResult<Self> {
        Self::decode(&mut Cursor::new(data), verify)
    }

    /// Fixed byte count of this header's version
    pub fn fixed_size(&self) -> u64 {
        fixed_header_size(self.version)
    }

    /// Encode the header to bytes
    pub fn to_bytes(&self) -> ChunkResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(self.fixed_size() as usize));
        self.write_le(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}

impl BinWrite for ChunkHeader {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: binrw::Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        CHUNK_MAGIC.write_options(writer, endian, ())?;
        self.version.write_options(writer, endian, ())?;
        self.header_size.write_options(writer, endian, ())?;
        self.compressed_size.write_options(writer, endian, ())?;
        self.guid.write_options(writer, endian, ())?;
        self.rolling_hash.write_options(writer, endian, ())?;
        self.storage_flags.value.write_options(writer, endian, ())?;

        if self.version >= 2 {
            self.sha_digest.write_options(writer, endian, ())?;
            self.hash_type.value.write_options(writer, endian, ())?;
        }

        if self.version >= 3 {
            self.uncompressed_size.write_options(writer, endian, ())?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn sample_header(version: u32) -> ChunkHeader {
        ChunkHeader {
            version,
            header_size: fixed_header_size(version) as u32,
            compressed_size: 12,
            guid: Guid::new(1, 2, 3, 4),
            rolling_hash: 0x0123_4567_89AB_CDEF,
            storage_flags: StorageFlags::new(StorageFlags::NONE),
            sha_digest: if version >= 2 {
                ShaDigest::from_data(b"payload")
            } else {
                ShaDigest::default()
            },
            hash_type: if version >= 2 {
                HashType::both()
            } else {
                HashType::default()
            },
            uncompressed_size: if version >= 3 {
                12
            } else {
                DEFAULT_UNCOMPRESSED_SIZE
            },
        }
    }

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(fixed_header_size(1), 41);
        assert_eq!(fixed_header_size(2), 62);
        assert_eq!(fixed_header_size(3), 66);
        assert_eq!(fixed_header_size(4), 66);
        assert_eq!(fixed_header_size(9), 66);
    }

    #[test]
    fn test_encoded_length_matches_fixed_size() {
        for version in 1..=LATEST_VERSION {
            let bytes = sample_header(version).to_bytes().expect("encode");
            assert_eq!(bytes.len() as u64, fixed_header_size(version));
            assert_eq!(&bytes[..4], &CHUNK_MAGIC.to_le_bytes());
        }
    }

    #[test]
    fn test_decode_leaves_cursor_at_payload() {
        let header = sample_header(3);
        let mut bytes = header.to_bytes().expect("encode");
        bytes.extend_from_slice(b"payload body");

        let mut cursor = Cursor::new(&bytes);
        let decoded = ChunkHeader::decode(&mut cursor, true).expect("decode");
        assert_eq!(decoded, header);
        assert_eq!(cursor.position(), 66);
    }

    #[test]
    fn test_decode_seeks_past_unknown_trailing_fields() {
        let mut header = sample_header(4);
        header.header_size = 70;
        let mut bytes = header.to_bytes().expect("encode");
        bytes.extend_from_slice(&[0xEE; 4]);
        bytes.extend_from_slice(b"data");

        let mut cursor = Cursor::new(&bytes);
        let decoded = ChunkHeader::decode(&mut cursor, true).expect("decode");
        assert_eq!(decoded.header_size, 70);
        assert_eq!(cursor.position(), 70);
    }

    #[test]
    fn test_lazy_decode_skips_hash_fields() {
        let header = sample_header(2);
        let bytes = header.to_bytes().expect("encode");

        let mut cursor = Cursor::new(&bytes);
        let decoded = ChunkHeader::decode(&mut cursor, false).expect("decode");
        assert_eq!(decoded.rolling_hash, 0);
        assert!(decoded.sha_digest.is_zero());
        assert_eq!(decoded.hash_type, HashType::default());
        assert_eq!(decoded.guid, header.guid);
        assert_eq!(cursor.position(), 62);
    }

    #[test]
    fn test_short_input_is_corrupt() {
        let bytes = sample_header(1).to_bytes().expect("encode");
        let err = ChunkHeader::parse(&bytes[..40], true).unwrap_err();
        assert!(matches!(err, ChunkError::CorruptHeader(_)));
    }

    #[test]
    fn test_truncated_v2_fields_fail_size_check() {
        let bytes = sample_header(2).to_bytes().expect("encode");
        let err = ChunkHeader::parse(&bytes[..50], true).unwrap_err();
        assert!(matches!(
            err,
            ChunkError::HeaderSizeMismatch {
                expected: 62,
                actual: 41
            }
        ));
    }

    #[test]
    fn test_bad_magic_reports_sentinels() {
        let mut bytes = sample_header(1).to_bytes().expect("encode");
        bytes[0] ^= 0x01;
        let err = ChunkHeader::parse(&bytes, true).unwrap_err();
        match err {
            ChunkError::InvalidMagic { expected, actual } => {
                assert_eq!(expected, CHUNK_MAGIC);
                assert_eq!(actual, CHUNK_MAGIC ^ 0x01);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_version_zero_rejected() {
        let mut header = sample_header(1);
        header.version = 0;
        let bytes = header.to_bytes().expect("encode");
        let err = ChunkHeader::parse(&bytes, true).unwrap_err();
        assert!(matches!(err, ChunkError::CorruptHeader(_)));
    }

    #[test]
    fn test_header_size_smaller_than_fields_rejected() {
        let mut header = sample_header(3);
        header.header_size = 41;
        let bytes = header.to_bytes().expect("encode");
        let err = ChunkHeader::parse(&bytes, true).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_header_size_beyond_input_rejected() {
        let mut header = sample_header(1);
        header.header_size = 4096;
        let bytes = header.to_bytes().expect("encode");
        let err = ChunkHeader::parse(&bytes, true).unwrap_err();
        assert!(matches!(err, ChunkError::CorruptHeader(_)));
    }

    #[test]
    fn test_default_is_latest() {
        let header = ChunkHeader::default();
        assert_eq!(header.version, LATEST_VERSION);
        assert_eq!(header.header_size, 66);
        assert_eq!(header.uncompressed_size, DEFAULT_UNCOMPRESSED_SIZE);
        assert_eq!(header.hash_type, HashType::rolling_only());
        assert!(!header.guid.is_valid());
    }
}
