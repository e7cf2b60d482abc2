//! Tree Store
//!
//! Owns the header and both tables; answers lookups by offset arithmetic
//! over the implicit tree encoding.

use std::collections::HashMap;

use crate::config::{Config, FilePolicy};
use crate::error::{FlatTreeError, Result};

use super::{DirEntry, DirId, FileEntry, Header, Name, MAGIC};

/// In-memory directory index
///
/// ## Invariants
/// - `header.directory_count == dirs.len()`, and `dirs` is never empty
/// - `dirs[0]` is the root
/// - Directory at position P owns `dirs[c..c + child_count]` where
///   `c = 1 + Σ child_count` over positions before P, and `c > P`
/// - Directory at position P owns `files[f..f + file_count]` where
///   `f = Σ file_count` over positions before P
/// - `index[id] == position` for every entry
///
/// Every insert or delete shifts the positions of all later entries, so a
/// position obtained before a mutation must not be reused after it.
#[derive(Debug, Clone)]
pub struct TreeStore {
    pub(super) header: Header,
    pub(super) dirs: Vec<DirEntry>,
    pub(super) files: Vec<FileEntry>,

    /// id → table position, refreshed for every shifted entry
    pub(super) index: HashMap<DirId, usize>,

    /// Σ file_count, kept in step with `files.len()`
    pub(super) total_files: usize,

    pub(super) file_policy: FilePolicy,
}

impl TreeStore {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a store holding only a root directory with id 0
    pub fn new(root_name: impl Into<Name>) -> Self {
        let root = DirEntry::leaf(0, root_name);
        let mut index = HashMap::new();
        index.insert(root.id, 0);

        Self {
            header: Header::new(1, 1),
            dirs: vec![root],
            files: Vec::new(),
            index,
            total_files: 0,
            file_policy: FilePolicy::default(),
        }
    }

    /// Create a fresh store from a config (root name, root id, file policy)
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut store = Self::new(config.root_name.as_str());
        store.dirs[0].id = config.first_id;
        store.index.clear();
        store.index.insert(config.first_id, 0);
        store.header.next_id = config.first_id + 1;
        store.file_policy = config.file_policy;
        Ok(store)
    }

    /// Build a store from pre-populated tables
    ///
    /// The tables must already satisfy the encoding invariants; anything
    /// else is rejected with `Corrupt`.
    pub fn from_parts(header: Header, dirs: Vec<DirEntry>, files: Vec<FileEntry>) -> Result<Self> {
        let index = validate_tables(&header, &dirs, &files)?;
        let total_files = files.len();

        Ok(Self {
            header,
            dirs,
            files,
            index,
            total_files,
            file_policy: FilePolicy::default(),
        })
    }

    /// Set the policy applied to files of removed directories
    pub fn with_file_policy(mut self, policy: FilePolicy) -> Self {
        self.file_policy = policy;
        self
    }

    pub fn set_file_policy(&mut self, policy: FilePolicy) {
        self.file_policy = policy;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn file_policy(&self) -> FilePolicy {
        self.file_policy
    }

    /// Number of directories
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Number of files across all directories
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn root_id(&self) -> DirId {
        self.dirs[0].id
    }

    /// The directory table in table order
    pub fn dir_entries(&self) -> &[DirEntry] {
        &self.dirs
    }

    /// The file table in table order
    pub fn file_entries(&self) -> &[FileEntry] {
        &self.files
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Resolve an id to its current table position
    pub fn position_of(&self, id: DirId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(FlatTreeError::NotFound(id))
    }

    pub fn contains(&self, id: DirId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: DirId) -> Result<&DirEntry> {
        let pos = self.position_of(id)?;
        Ok(&self.dirs[pos])
    }

    /// Id of the directory's parent, `None` for the root
    pub fn parent_of(&self, id: DirId) -> Result<Option<DirId>> {
        let pos = self.position_of(id)?;
        Ok(self.parent_position(pos).map(|p| self.dirs[p].id))
    }

    /// Start of the directory's child run in the directory table
    pub fn child_offset(&self, id: DirId) -> Result<usize> {
        let pos = self.position_of(id)?;
        Ok(self.child_offset_at(pos))
    }

    /// Start of the directory's file run in the file table
    pub fn file_offset(&self, id: DirId) -> Result<usize> {
        let pos = self.position_of(id)?;
        Ok(self.file_offset_at(pos))
    }

    pub fn child_count(&self, id: DirId) -> Result<u32> {
        Ok(self.get(id)?.child_count)
    }

    pub fn file_count(&self, id: DirId) -> Result<u32> {
        Ok(self.get(id)?.file_count)
    }

    /// Copy of the directory's immediate children, in table order
    pub fn children(&self, id: DirId) -> Result<Vec<DirEntry>> {
        let pos = self.position_of(id)?;
        Ok(self.dirs[self.child_range(pos)].to_vec())
    }

    /// Ids of the directory's immediate children, in table order
    pub fn child_ids(&self, id: DirId) -> Result<Vec<DirId>> {
        let pos = self.position_of(id)?;
        Ok(self.dirs[self.child_range(pos)].iter().map(|d| d.id).collect())
    }

    /// Copy of the directory's files, in table order
    pub fn files(&self, id: DirId) -> Result<Vec<FileEntry>> {
        let pos = self.position_of(id)?;
        Ok(self.files[self.file_range(pos)].to_vec())
    }

    /// Number of edges between the directory and the root
    pub fn depth_of(&self, id: DirId) -> Result<usize> {
        let mut pos = self.position_of(id)?;
        let mut depth = 0;
        while let Some(parent) = self.parent_position(pos) {
            pos = parent;
            depth += 1;
        }
        Ok(depth)
    }

    // =========================================================================
    // Id Allocation
    // =========================================================================

    /// Hand out the next unused id
    ///
    /// Ids are never reused. Once the counter reaches `DirId::MAX` every
    /// further allocation fails.
    pub fn next_id(&mut self) -> Result<DirId> {
        self.ensure_id_available()?;
        let id = self.header.next_id;
        self.header.next_id += 1;
        Ok(id)
    }

    pub(super) fn ensure_id_available(&self) -> Result<()> {
        if self.header.next_id == DirId::MAX {
            return Err(FlatTreeError::IdSpaceExhausted);
        }
        Ok(())
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Re-check every table invariant and the id index
    pub fn verify(&self) -> Result<()> {
        let index = validate_tables(&self.header, &self.dirs, &self.files)?;
        if index != self.index {
            return Err(FlatTreeError::Corrupt(
                "id index out of step with directory table".to_string(),
            ));
        }
        if self.total_files != self.files.len() {
            return Err(FlatTreeError::Corrupt(format!(
                "cached file total {} does not match file table length {}",
                self.total_files,
                self.files.len()
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Position Arithmetic
    // =========================================================================

    /// Parent of the entry at `pos`: the first directory whose running
    /// child total reaches `pos`
    pub(super) fn parent_position(&self, pos: usize) -> Option<usize> {
        if pos == 0 {
            return None;
        }
        let mut running = 0usize;
        for (i, dir) in self.dirs.iter().enumerate() {
            running += dir.child_count as usize;
            if running >= pos {
                return Some(i);
            }
        }
        None
    }

    pub(super) fn child_offset_at(&self, pos: usize) -> usize {
        1 + self.dirs[..pos]
            .iter()
            .map(|d| d.child_count as usize)
            .sum::<usize>()
    }

    pub(super) fn file_offset_at(&self, pos: usize) -> usize {
        self.dirs[..pos]
            .iter()
            .map(|d| d.file_count as usize)
            .sum()
    }

    pub(super) fn child_range(&self, pos: usize) -> std::ops::Range<usize> {
        let start = self.child_offset_at(pos);
        start..start + self.dirs[pos].child_count as usize
    }

    pub(super) fn file_range(&self, pos: usize) -> std::ops::Range<usize> {
        let start = self.file_offset_at(pos);
        start..start + self.dirs[pos].file_count as usize
    }

    /// Child-run and file-run starts for every position, in one pass
    pub(crate) fn run_offsets(&self) -> RunOffsets {
        let mut children = Vec::with_capacity(self.dirs.len());
        let mut files = Vec::with_capacity(self.dirs.len());
        let (mut next_child, mut next_file) = (1usize, 0usize);
        for dir in &self.dirs {
            children.push(next_child);
            files.push(next_file);
            next_child += dir.child_count as usize;
            next_file += dir.file_count as usize;
        }
        RunOffsets { children, files }
    }

    /// Positions of the subtree rooted at `pos`, in ascending order.
    /// Walks an explicit stack, so depth is bounded only by the table size.
    pub(super) fn subtree_positions(&self, pos: usize, runs: &RunOffsets) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![pos];
        while let Some(p) = stack.pop() {
            out.push(p);
            stack.extend(runs.child_range(p, &self.dirs[p]));
        }
        out.sort_unstable();
        out
    }

    /// Refresh index entries for every position from `start` onward
    pub(super) fn reindex_from(&mut self, start: usize) {
        for (pos, dir) in self.dirs.iter().enumerate().skip(start) {
            self.index.insert(dir.id, pos);
        }
    }
}

/// Start of every directory's child run and file run, by position
///
/// Only valid until the next mutation.
#[derive(Debug)]
pub(crate) struct RunOffsets {
    pub(crate) children: Vec<usize>,
    pub(crate) files: Vec<usize>,
}

impl RunOffsets {
    pub(crate) fn child_range(&self, pos: usize, dir: &DirEntry) -> std::ops::Range<usize> {
        self.children[pos]..self.children[pos] + dir.child_count as usize
    }

    pub(crate) fn file_range(&self, pos: usize, dir: &DirEntry) -> std::ops::Range<usize> {
        self.files[pos]..self.files[pos] + dir.file_count as usize
    }
}

/// Check the encoding invariants and build the id → position index
fn validate_tables(
    header: &Header,
    dirs: &[DirEntry],
    files: &[FileEntry],
) -> Result<HashMap<DirId, usize>> {
    if dirs.is_empty() {
        return Err(FlatTreeError::Corrupt(
            "directory table has no root".to_string(),
        ));
    }

    if &header.magic != MAGIC {
        return Err(FlatTreeError::Corrupt(format!(
            "invalid header magic: expected FTRE, got {:?}",
            header.magic
        )));
    }

    if header.directory_count as usize != dirs.len() {
        return Err(FlatTreeError::Corrupt(format!(
            "header counts {} directories, table holds {}",
            header.directory_count,
            dirs.len()
        )));
    }

    let mut index = HashMap::with_capacity(dirs.len());
    let mut children_before = 0u64;
    let mut files_total = 0u64;

    for (pos, dir) in dirs.iter().enumerate() {
        if dir.id >= header.next_id {
            return Err(FlatTreeError::Corrupt(format!(
                "id {} at position {} is not below next id {}",
                dir.id, pos, header.next_id
            )));
        }
        if index.insert(dir.id, pos).is_some() {
            return Err(FlatTreeError::Corrupt(format!("duplicate id {}", dir.id)));
        }

        // Child run must start after its parent
        if dir.child_count > 0 && 1 + children_before <= pos as u64 {
            return Err(FlatTreeError::Corrupt(format!(
                "children of id {} would start at {}, before or at its own position {}",
                dir.id,
                1 + children_before,
                pos
            )));
        }

        children_before += u64::from(dir.child_count);
        files_total += u64::from(dir.file_count);
    }

    if children_before != dirs.len() as u64 - 1 {
        return Err(FlatTreeError::Corrupt(format!(
            "child counts sum to {}, expected {}",
            children_before,
            dirs.len() - 1
        )));
    }

    if files_total != files.len() as u64 {
        return Err(FlatTreeError::Corrupt(format!(
            "file counts sum to {}, file table holds {}",
            files_total,
            files.len()
        )));
    }

    Ok(index)
}
