//! Tests for the snapshot codec
//!
//! These tests verify:
//! - Packed layout sizes and header fields
//! - Decoding restores an identical store
//! - Corruption detection (magic, checksum, truncation, bad tables)
//! - File write/read through a temp file

mod common;

use common::{assert_encoding_holds, child_names, file_names};
use flattree::seed::sample_store;
use flattree::snapshot::{
    decode, encode, read_snapshot, write_snapshot, DIR_RECORD_SIZE, FILE_RECORD_SIZE,
    FOOTER_SIZE, HEADER_SIZE,
};
use flattree::{FlatTreeError, TreeStore};
use tempfile::TempDir;

/// Replace the trailing CRC so a deliberately edited body still passes the checksum
fn reseal(bytes: &mut Vec<u8>) {
    let body_len = bytes.len() - FOOTER_SIZE;
    bytes.truncate(body_len);
    let crc = crc32fast::hash(bytes);
    bytes.extend_from_slice(&crc.to_le_bytes());
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_record_sizes() {
    assert_eq!(HEADER_SIZE, 12);
    assert_eq!(DIR_RECORD_SIZE, 44);
    assert_eq!(FILE_RECORD_SIZE, 36);
    assert_eq!(FOOTER_SIZE, 4);
}

#[test]
fn test_encoded_length_and_header() {
    let store = sample_store().unwrap();
    let bytes = encode(&store);

    assert_eq!(bytes.len(), 12 + 9 * 44 + 4 * 36 + 4);
    assert_eq!(&bytes[0..4], b"FTRE");
    assert_eq!(&bytes[4..8], &9u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &20u32.to_le_bytes());
}

#[test]
fn test_directory_record_layout() {
    let store = sample_store().unwrap();
    let bytes = encode(&store);

    // Second record is img: 0 files, 3 children, id 1
    let record = &bytes[HEADER_SIZE + DIR_RECORD_SIZE..HEADER_SIZE + 2 * DIR_RECORD_SIZE];
    assert_eq!(&record[..3], b"img");
    assert!(record[3..32].iter().all(|&b| b == 0));
    assert_eq!(&record[32..36], &0u32.to_le_bytes());
    assert_eq!(&record[36..40], &3u32.to_le_bytes());
    assert_eq!(&record[40..44], &1u32.to_le_bytes());
}

#[test]
fn test_full_width_name_has_no_terminator() {
    let mut store = TreeStore::new("root");
    let long = "n".repeat(32);
    let id = store.add_dir(0, long.as_str()).unwrap();

    let decoded = decode(&encode(&store)).unwrap();

    assert_eq!(decoded.get(id).unwrap().name.as_str(), long);
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_restores_store() {
    let mut store = sample_store().unwrap();
    let tmp = store.add_dir(0, "tmp").unwrap();
    store.add_file(tmp, "café.txt", 7).unwrap();

    let decoded = decode(&encode(&store)).unwrap();

    assert_eq!(decoded.header(), store.header());
    assert_eq!(decoded.dir_entries(), store.dir_entries());
    assert_eq!(decoded.file_entries(), store.file_entries());
    assert_eq!(child_names(&decoded, 0), vec!["img", "docs", "tmp"]);
    assert_eq!(file_names(&decoded, tmp), vec!["café.txt"]);
    assert_encoding_holds(&decoded);
}

#[test]
fn test_decoded_store_keeps_allocating_ids() {
    let store = sample_store().unwrap();
    let mut decoded = decode(&encode(&store)).unwrap();

    assert_eq!(decoded.add_dir(0, "next").unwrap(), 20);
}

#[test]
fn test_decode_rejects_bad_magic() {
    let mut bytes = encode(&sample_store().unwrap());
    bytes[0] = b'X';

    assert!(matches!(decode(&bytes), Err(FlatTreeError::Corrupt(_))));
}

#[test]
fn test_decode_rejects_flipped_byte() {
    let mut bytes = encode(&sample_store().unwrap());
    bytes[HEADER_SIZE + 5] ^= 0xFF;

    assert!(matches!(decode(&bytes), Err(FlatTreeError::Corrupt(_))));
}

#[test]
fn test_decode_rejects_short_input() {
    let bytes = encode(&sample_store().unwrap());

    assert!(matches!(decode(&bytes[..10]), Err(FlatTreeError::Corrupt(_))));
    assert!(matches!(decode(&[]), Err(FlatTreeError::Corrupt(_))));
}

#[test]
fn test_decode_rejects_missing_file_record() {
    let mut bytes = encode(&sample_store().unwrap());
    let end = bytes.len() - FOOTER_SIZE;
    bytes.drain(end - FILE_RECORD_SIZE..end);
    reseal(&mut bytes);

    assert!(matches!(decode(&bytes), Err(FlatTreeError::Corrupt(_))));
}

#[test]
fn test_decode_rejects_truncated_directory_region() {
    let mut bytes = encode(&sample_store().unwrap());
    // Claim far more directories than are present
    bytes[4..8].copy_from_slice(&1000u32.to_le_bytes());
    reseal(&mut bytes);

    assert!(matches!(decode(&bytes), Err(FlatTreeError::Corrupt(_))));
}

#[test]
fn test_decode_rejects_broken_encoding() {
    let mut bytes = encode(&sample_store().unwrap());
    // root's child count: 2 -> 5
    let offset = HEADER_SIZE + 36;
    bytes[offset..offset + 4].copy_from_slice(&5u32.to_le_bytes());
    reseal(&mut bytes);

    assert!(matches!(decode(&bytes), Err(FlatTreeError::Corrupt(_))));
}

#[test]
fn test_decode_rejects_invalid_utf8_name() {
    let mut bytes = encode(&sample_store().unwrap());
    bytes[HEADER_SIZE] = 0xFF;
    reseal(&mut bytes);

    assert!(matches!(decode(&bytes), Err(FlatTreeError::Corrupt(_))));
}

// =============================================================================
// File Tests
// =============================================================================

#[test]
fn test_write_and_read_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.snap");
    let store = sample_store().unwrap();

    write_snapshot(&store, &path, true).unwrap();
    let loaded = read_snapshot(&path).unwrap();

    assert_eq!(loaded.dir_entries(), store.dir_entries());
    assert_eq!(loaded.file_entries(), store.file_entries());
    assert!(!temp_dir.path().join("index.snap.tmp").exists());
}

#[test]
fn test_write_snapshot_leaves_same_stem_sibling_alone() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.snap");
    let sibling = temp_dir.path().join("index.tmp");
    std::fs::write(&sibling, b"other").unwrap();

    write_snapshot(&sample_store().unwrap(), &path, false).unwrap();

    assert_eq!(std::fs::read(&sibling).unwrap(), b"other");
    assert!(read_snapshot(&path).is_ok());
}

#[test]
fn test_from_parts_header_survives_round_trip() {
    let store = sample_store().unwrap();
    let rebuilt = TreeStore::from_parts(
        *store.header(),
        store.dir_entries().to_vec(),
        store.file_entries().to_vec(),
    )
    .unwrap();

    let decoded = decode(&encode(&rebuilt)).unwrap();
    assert_eq!(decoded.header(), store.header());
}

#[test]
fn test_write_snapshot_creates_parent_dirs() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("deeper").join("index.snap");

    write_snapshot(&TreeStore::new("root"), &path, false).unwrap();

    assert!(path.exists());
}

#[test]
fn test_write_snapshot_replaces_previous() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.snap");
    let mut store = TreeStore::new("root");

    write_snapshot(&store, &path, false).unwrap();
    store.add_dir(0, "later").unwrap();
    write_snapshot(&store, &path, false).unwrap();

    let loaded = read_snapshot(&path).unwrap();
    assert_eq!(child_names(&loaded, 0), vec!["later"]);
}

#[test]
fn test_read_missing_snapshot_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.snap");

    assert!(matches!(read_snapshot(&path), Err(FlatTreeError::Io(_))));
}
