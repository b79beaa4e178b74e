#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for chunk container decoding, loading and verification

use binrw::io::Cursor;
use chunkette_crypto::ShaDigest;
use chunkette_formats::chunk::{
    CHUNK_MAGIC, ChunkBuilder, ChunkError, ChunkHeader, DEFAULT_UNCOMPRESSED_SIZE, HashKind,
    HashType, LATEST_VERSION, StorageFlags, fixed_header_size,
};
use chunkette_formats::Guid;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const GUID: Guid = Guid::new(0xDEAD_BEEF, 0x0BAD_F00D, 0x1234_5678, 0x9ABC_DEF0);

fn build(version: u32, compress: bool, data: &[u8]) -> (ChunkHeader, Vec<u8>) {
    ChunkBuilder::new(GUID)
        .with_version(version)
        .expect("valid version")
        .with_compression(compress)
        .build_parts(data)
        .expect("build")
}

fn container(header: &ChunkHeader, stored: &[u8]) -> Vec<u8> {
    let mut bytes = header.to_bytes().expect("encode header");
    bytes.extend_from_slice(stored);
    bytes
}

fn header_strategy() -> impl Strategy<Value = ChunkHeader> {
    (
        1..=LATEST_VERSION,
        any::<u32>(),
        any::<(u32, u32, u32, u32)>(),
        any::<u64>(),
        any::<u8>(),
        any::<[u8; 20]>(),
        any::<u8>(),
        any::<u32>(),
    )
        .prop_map(
            |(version, compressed_size, (a, b, c, d), rolling_hash, storage, sha, hash_type, uncompressed)| {
                ChunkHeader {
                    version,
                    header_size: fixed_header_size(version) as u32,
                    compressed_size,
                    guid: Guid::new(a, b, c, d),
                    rolling_hash,
                    storage_flags: StorageFlags::new(storage),
                    sha_digest: if version >= 2 {
                        ShaDigest::from_bytes(sha)
                    } else {
                        ShaDigest::default()
                    },
                    hash_type: if version >= 2 {
                        HashType::new(hash_type)
                    } else {
                        HashType::default()
                    },
                    uncompressed_size: if version >= 3 {
                        uncompressed
                    } else {
                        DEFAULT_UNCOMPRESSED_SIZE
                    },
                }
            },
        )
}

proptest! {
    #[test]
    fn header_round_trip_consumes_fixed_size(header in header_strategy()) {
        let bytes = header.to_bytes().expect("encode");
        prop_assert_eq!(bytes.len() as u64, fixed_header_size(header.version));

        let mut cursor = Cursor::new(&bytes);
        let decoded = ChunkHeader::decode(&mut cursor, true).expect("decode");
        prop_assert_eq!(cursor.position(), fixed_header_size(header.version));
        prop_assert_eq!(decoded, header);
    }

    #[test]
    fn flipped_magic_bit_is_format_error(bit in 0u32..32, verify in any::<bool>(), version in 1..=LATEST_VERSION) {
        let (header, stored) = build(version, false, b"magic test payload");
        let mut bytes = container(&header, &stored);
        let magic = CHUNK_MAGIC ^ (1 << bit);
        bytes[..4].copy_from_slice(&magic.to_le_bytes());

        let err = ChunkHeader::parse(&bytes, verify).unwrap_err();
        prop_assert!(err.is_format_error());
        let is_invalid_magic = matches!(err, ChunkError::InvalidMagic { actual, .. } if actual == magic);
        prop_assert!(is_invalid_magic);
    }

    #[test]
    fn oversized_compressed_size_is_size_error(extra in 1u32..4096) {
        let (mut header, stored) = build(3, false, b"sized payload");
        header.compressed_size = stored.len() as u32 + extra;
        let bytes = container(&header, &stored);

        let mut cursor = Cursor::new(&bytes);
        let decoded = ChunkHeader::decode(&mut cursor, true).expect("decode");
        let before = cursor.position();
        let err = decoded.load(&mut cursor, true).unwrap_err();
        prop_assert!(
            matches!(err, ChunkError::IncorrectFileSize { .. }),
            "unexpected error: {err}"
        );
        prop_assert_eq!(cursor.position(), before);
    }
}

#[test]
fn zero_guid_decodes_but_fails_load() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xB1FE_3AA2_u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&41u32.to_le_bytes());
    bytes.extend_from_slice(&4u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 16]);
    bytes.extend_from_slice(&0u64.to_le_bytes());
    bytes.push(StorageFlags::NONE);
    bytes.extend_from_slice(b"data");

    let mut cursor = Cursor::new(&bytes);
    let header = ChunkHeader::decode(&mut cursor, true).expect("structurally valid");
    assert_eq!(header.version, 1);
    assert!(!header.guid.is_valid());

    let err = header.load(&mut cursor, true).unwrap_err();
    assert!(matches!(err, ChunkError::CorruptHeader(_)), "got {err}");
}

#[test]
fn v3_short_inflation_is_decompress_failure() {
    let data = vec![0x42u8; 1_048_575];
    let (mut header, stored) = build(3, true, &data);
    header.uncompressed_size = 1_048_576;
    let bytes = container(&header, &stored);

    let err = ChunkHeader::load_container(&bytes, true).unwrap_err();
    assert!(matches!(err, ChunkError::DecompressFailure(_)), "got {err}");
    assert!(err.is_integrity_error());
}

#[test]
fn long_inflation_is_decompress_failure() {
    let data = vec![0x42u8; 2048];
    let (mut header, stored) = build(4, true, &data);
    header.uncompressed_size = 2047;
    let bytes = container(&header, &stored);

    let err = ChunkHeader::load_container(&bytes, false).unwrap_err();
    assert!(matches!(err, ChunkError::DecompressFailure(_)), "got {err}");
}

#[test]
fn sha_mismatch_alone_fails() {
    let (mut header, stored) = build(4, false, b"verified payload");
    header.sha_digest = ShaDigest::from_data(b"something else");
    let bytes = container(&header, &stored);

    match ChunkHeader::load_container(&bytes, true).unwrap_err() {
        ChunkError::HashCheckFailed { kind, expected, actual } => {
            assert_eq!(kind, HashKind::Sha1);
            assert_eq!(expected, ShaDigest::from_data(b"something else").to_hex());
            assert_eq!(actual, ShaDigest::from_data(b"verified payload").to_hex());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rolling_mismatch_alone_fails() {
    let (mut header, stored) = build(4, false, b"verified payload");
    header.rolling_hash ^= 1;
    let bytes = container(&header, &stored);

    match ChunkHeader::load_container(&bytes, true).unwrap_err() {
        ChunkError::HashCheckFailed { kind, .. } => assert_eq!(kind, HashKind::Rolling),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn both_mismatched_reports_rolling_first() {
    let (mut header, stored) = build(4, false, b"verified payload");
    header.rolling_hash ^= 1;
    header.sha_digest = ShaDigest::default();
    let bytes = container(&header, &stored);

    match ChunkHeader::load_container(&bytes, true).unwrap_err() {
        ChunkError::HashCheckFailed { kind, .. } => assert_eq!(kind, HashKind::Rolling),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unflagged_hash_is_not_checked() {
    let (mut header, stored) = build(4, false, b"verified payload");
    header.hash_type = HashType::new(HashType::SHA1);
    header.rolling_hash = 0;
    let bytes = container(&header, &stored);

    let (_, payload) = ChunkHeader::load_container(&bytes, true).expect("sha-only verification");
    assert_eq!(payload, b"verified payload");
}

#[test]
fn lazy_mode_accepts_wrong_digest() {
    let (mut header, stored) = build(4, true, b"trusted payload".repeat(64).as_slice());
    header.sha_digest = ShaDigest::from_data(b"wrong");
    header.rolling_hash = 0xBAD;
    let bytes = container(&header, &stored);

    assert!(ChunkHeader::load_container(&bytes, true).is_err());
    let (decoded, payload) = ChunkHeader::load_container(&bytes, false).expect("lazy load");
    assert_eq!(payload, b"trusted payload".repeat(64));
    assert!(decoded.sha_digest.is_zero());
}

#[test]
fn missing_hash_info_only_when_verifying() {
    let (mut header, stored) = build(2, false, b"payload");
    header.hash_type = HashType::new(HashType::NONE);
    let bytes = container(&header, &stored);

    let err = ChunkHeader::load_container(&bytes, true).unwrap_err();
    assert!(matches!(err, ChunkError::MissingHashInfo), "got {err}");
    assert!(ChunkHeader::load_container(&bytes, false).is_ok());
}

#[test]
fn encrypted_storage_is_unsupported() {
    let (mut header, stored) = build(4, false, b"secret");
    header.storage_flags.set(StorageFlags::ENCRYPTED);
    let bytes = container(&header, &stored);

    let err = ChunkHeader::load_container(&bytes, true).unwrap_err();
    assert!(matches!(err, ChunkError::UnsupportedStorage(0x02)), "got {err}");
}

#[test]
fn size_error_precedes_unsupported_storage() {
    let (mut header, stored) = build(4, false, b"secret");
    header.storage_flags.set(StorageFlags::ENCRYPTED);
    header.compressed_size = 1024;
    let bytes = container(&header, &stored);

    let err = ChunkHeader::load_container(&bytes, true).unwrap_err();
    assert!(matches!(err, ChunkError::IncorrectFileSize { expected: 1024, .. }), "got {err}");
}

#[test]
fn payload_follows_advertised_header_size() {
    let (mut header, stored) = build(4, false, b"payload after padding");
    header.header_size += 8;
    let mut bytes = header.to_bytes().expect("encode");
    bytes.extend_from_slice(&[0xFF; 8]);
    bytes.extend_from_slice(&stored);

    let (_, payload) = ChunkHeader::load_container(&bytes, true).expect("load");
    assert_eq!(payload, b"payload after padding");
}
