//! Table entry definitions
//!
//! Value types stored in the header and the two tables.

use std::fmt;

use super::{DirId, MAGIC, MAX_NAME_LEN};

/// Bounded entry name
///
/// Holds at most [`MAX_NAME_LEN`] bytes of UTF-8. Longer input is cut at the
/// last character boundary that fits; anything after an interior NUL is
/// dropped so the name survives the NUL-padded snapshot layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn new(raw: &str) -> Self {
        let raw = raw.split('\0').next().unwrap_or_default();
        let mut end = raw.len().min(MAX_NAME_LEN);
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        Name(raw[..end].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Name {
    fn from(raw: &str) -> Self {
        Name::new(raw)
    }
}

impl From<String> for Name {
    fn from(raw: String) -> Self {
        Name::new(&raw)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-wide bookkeeping for one store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format tag, only meaningful in snapshots
    pub magic: [u8; 4],

    /// Number of entries in the directory table
    pub directory_count: u32,

    /// Next unused directory id
    pub next_id: DirId,
}

impl Header {
    pub fn new(directory_count: u32, next_id: DirId) -> Self {
        Self {
            magic: *MAGIC,
            directory_count,
            next_id,
        }
    }
}

/// A directory record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: Name,

    /// Number of files in this directory's file run
    pub file_count: u32,

    /// Number of immediate child directories
    pub child_count: u32,

    pub id: DirId,
}

impl DirEntry {
    /// A fresh leaf: no children, no files
    pub fn leaf(id: DirId, name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            file_count: 0,
            child_count: 0,
            id,
        }
    }

    /// An entry with explicit counts (used when seeding or decoding)
    pub fn with_counts(
        id: DirId,
        name: impl Into<Name>,
        child_count: u32,
        file_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            file_count,
            child_count,
            id,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.child_count == 0
    }
}

/// A file record. Sizes are informational; no content is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: Name,
    pub size: u32,
}

impl FileEntry {
    pub fn new(name: impl Into<Name>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}
