//! Snapshot Reader
//!
//! Parses the packed snapshot layout back into a validated store.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{FlatTreeError, Result};
use crate::table::{DirEntry, FileEntry, Header, Name, TreeStore, MAGIC, MAX_NAME_LEN};

use super::{DIR_RECORD_SIZE, FILE_RECORD_SIZE, FOOTER_SIZE, HEADER_SIZE};

/// Decode snapshot bytes into a store
///
/// Checks, in order: minimum length, magic, checksum, record lengths, name
/// encoding, and finally the table invariants.
pub fn decode(bytes: &[u8]) -> Result<TreeStore> {
    if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
        return Err(FlatTreeError::Corrupt(format!(
            "snapshot too short: {} bytes",
            bytes.len()
        )));
    }

    if &bytes[0..4] != MAGIC {
        return Err(FlatTreeError::Corrupt(format!(
            "invalid snapshot magic: expected FTRE, got {:?}",
            &bytes[0..4]
        )));
    }

    // Checksum covers everything before the footer
    let (body, footer) = bytes.split_at(bytes.len() - FOOTER_SIZE);
    let stored_crc = read_u32(footer, 0);
    let actual_crc = crc32fast::hash(body);
    if stored_crc != actual_crc {
        return Err(FlatTreeError::Corrupt(format!(
            "snapshot checksum mismatch: stored {:08x}, computed {:08x}",
            stored_crc, actual_crc
        )));
    }

    let directory_count = read_u32(body, 4);
    let next_id = read_u32(body, 8);
    let header = Header::new(directory_count, next_id);

    // Directory records
    let dir_bytes = directory_count as usize * DIR_RECORD_SIZE;
    let dir_end = HEADER_SIZE + dir_bytes;
    if body.len() < dir_end {
        return Err(FlatTreeError::Corrupt(format!(
            "snapshot truncated: {} directory records need {} bytes, {} available",
            directory_count,
            dir_bytes,
            body.len() - HEADER_SIZE
        )));
    }

    let mut dirs = Vec::with_capacity(directory_count as usize);
    let mut file_total = 0usize;
    for record in body[HEADER_SIZE..dir_end].chunks_exact(DIR_RECORD_SIZE) {
        let name = read_name(record)?;
        let file_count = read_u32(record, MAX_NAME_LEN);
        let child_count = read_u32(record, MAX_NAME_LEN + 4);
        let id = read_u32(record, MAX_NAME_LEN + 8);
        file_total += file_count as usize;
        dirs.push(DirEntry::with_counts(id, name, child_count, file_count));
    }

    // File records: count derived from the directory table
    let file_region = &body[dir_end..];
    if file_region.len() != file_total * FILE_RECORD_SIZE {
        return Err(FlatTreeError::Corrupt(format!(
            "file region holds {} bytes, {} files need {}",
            file_region.len(),
            file_total,
            file_total * FILE_RECORD_SIZE
        )));
    }

    let mut files = Vec::with_capacity(file_total);
    for record in file_region.chunks_exact(FILE_RECORD_SIZE) {
        let name = read_name(record)?;
        let size = read_u32(record, MAX_NAME_LEN);
        files.push(FileEntry::new(name, size));
    }

    TreeStore::from_parts(header, dirs, files)
}

/// Read and decode the snapshot at `path`
pub fn read_snapshot(path: &Path) -> Result<TreeStore> {
    let bytes = fs::read(path)?;
    decode(&bytes).map_err(|e| {
        warn!(path = %path.display(), error = %e, "rejected snapshot");
        e
    })
}

/// Little-endian u32 at `offset`; callers have already bounds-checked
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(raw)
}

/// NUL-padded name field at the start of a record
fn read_name(record: &[u8]) -> Result<Name> {
    let field = &record[..MAX_NAME_LEN];
    let len = field.iter().position(|&b| b == 0).unwrap_or(MAX_NAME_LEN);
    let text = std::str::from_utf8(&field[..len])
        .map_err(|e| FlatTreeError::Corrupt(format!("name is not valid UTF-8: {}", e)))?;
    Ok(Name::new(text))
}
