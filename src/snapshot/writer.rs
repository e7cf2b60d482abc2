//! Snapshot Writer
//!
//! Serializes a store into the packed snapshot layout.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::table::{Name, TreeStore, MAX_NAME_LEN};

use super::{DIR_RECORD_SIZE, FILE_RECORD_SIZE, FOOTER_SIZE, HEADER_SIZE};

/// Encode a store into snapshot bytes
pub fn encode(store: &TreeStore) -> Vec<u8> {
    let dirs = store.dir_entries();
    let files = store.file_entries();
    let header = store.header();

    let mut buf = Vec::with_capacity(
        HEADER_SIZE + dirs.len() * DIR_RECORD_SIZE + files.len() * FILE_RECORD_SIZE + FOOTER_SIZE,
    );

    // Header
    buf.extend_from_slice(&header.magic);
    buf.extend_from_slice(&header.directory_count.to_le_bytes());
    buf.extend_from_slice(&header.next_id.to_le_bytes());

    // Directory records
    for dir in dirs {
        put_name(&mut buf, &dir.name);
        buf.extend_from_slice(&dir.file_count.to_le_bytes());
        buf.extend_from_slice(&dir.child_count.to_le_bytes());
        buf.extend_from_slice(&dir.id.to_le_bytes());
    }

    // File records
    for file in files {
        put_name(&mut buf, &file.name);
        buf.extend_from_slice(&file.size.to_le_bytes());
    }

    // Footer
    let crc = crc32fast::hash(&buf);
    buf.extend_from_slice(&crc.to_le_bytes());

    buf
}

/// Write a snapshot to `path`
///
/// The image goes to a sibling temp file first and is renamed over `path`,
/// so a crash mid-write leaves the previous snapshot intact.
pub fn write_snapshot(store: &TreeStore, path: &Path, sync: bool) -> Result<()> {
    let bytes = encode(store);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        writer.write_all(&bytes)?;
        writer.flush()?;

        if sync {
            writer.get_ref().sync_all()?;
        }
    }
    fs::rename(&tmp_path, path)?;

    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        dirs = store.len(),
        files = store.total_files(),
        "snapshot written"
    );
    Ok(())
}

/// `<file name>.tmp` next to `path`, so `a.snap` and `a.db` never share one
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write a name as a fixed-width, NUL-padded field
fn put_name(buf: &mut Vec<u8>, name: &Name) {
    let mut field = [0u8; MAX_NAME_LEN];
    let bytes = name.as_bytes();
    field[..bytes.len()].copy_from_slice(bytes);
    buf.extend_from_slice(&field);
}
