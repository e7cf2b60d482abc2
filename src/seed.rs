//! Seed Module
//!
//! Demo data and bulk population on top of the public store API.

use crate::error::Result;
use crate::table::{DirEntry, DirId, FileEntry, Header, TreeStore};

/// Next id handed out by the sample store
pub const SAMPLE_NEXT_ID: DirId = 20;

/// The demo tree with ids 0..=8:
///
/// ```text
/// root (0)
/// ├── img (1)
/// │   ├── 2009 (3)
/// │   ├── 2010 (4)
/// │   └── 2011 (5)      1.jpg, 2.jpg
/// └── docs (2)          manifest.txt
///     ├── resume (6)
///     ├── work (7)
///     └── life (8)      diary.txt
/// ```
pub fn sample_store() -> Result<TreeStore> {
    let dirs = vec![
        DirEntry::with_counts(0, "root", 2, 0),
        DirEntry::with_counts(1, "img", 3, 0),
        DirEntry::with_counts(2, "docs", 3, 1),
        DirEntry::with_counts(3, "2009", 0, 0),
        DirEntry::with_counts(4, "2010", 0, 0),
        DirEntry::with_counts(5, "2011", 0, 2),
        DirEntry::with_counts(6, "resume", 0, 0),
        DirEntry::with_counts(7, "work", 0, 0),
        DirEntry::with_counts(8, "life", 0, 1),
    ];

    let files = vec![
        FileEntry::new("manifest.txt", 200),
        FileEntry::new("1.jpg", 200),
        FileEntry::new("2.jpg", 210),
        FileEntry::new("diary.txt", 100),
    ];

    let header = Header::new(dirs.len() as u32, SAMPLE_NEXT_ID);
    TreeStore::from_parts(header, dirs, files)
}

/// Nested description of a directory to create
#[derive(Debug, Clone, Default)]
pub struct SeedDir {
    pub name: String,
    pub files: Vec<(String, u32)>,
    pub children: Vec<SeedDir>,
}

impl SeedDir {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn file(mut self, name: impl Into<String>, size: u32) -> Self {
        self.files.push((name.into(), size));
        self
    }

    pub fn child(mut self, dir: SeedDir) -> Self {
        self.children.push(dir);
        self
    }
}

/// Create `seed` (and everything under it) beneath `parent`
///
/// Directories are inserted parent before child. The work happens on a
/// staged copy that only replaces `store` once every insert succeeded.
/// Returns the id of the directory created for `seed` itself.
pub fn populate(store: &mut TreeStore, parent: DirId, seed: &SeedDir) -> Result<DirId> {
    let mut staged = store.clone();
    let id = populate_into(&mut staged, parent, seed)?;
    *store = staged;
    Ok(id)
}

fn populate_into(store: &mut TreeStore, parent: DirId, seed: &SeedDir) -> Result<DirId> {
    let id = store.add_dir(parent, seed.name.as_str())?;
    for (name, size) in &seed.files {
        store.add_file(id, name.as_str(), *size)?;
    }
    for child in &seed.children {
        populate_into(store, id, child)?;
    }
    Ok(id)
}
