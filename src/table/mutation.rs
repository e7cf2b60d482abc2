//! Structural mutations
//!
//! Insert and delete splice one entry into or out of a table and then fix
//! up the counts that describe the split. Each public operation validates
//! everything it needs before touching the tables, so a failed call leaves
//! the store exactly as it was.

use tracing::debug;

use crate::config::FilePolicy;
use crate::error::{FlatTreeError, Result};

use super::store::RunOffsets;
use super::{DirEntry, DirId, FileEntry, Name, TreeStore};

impl TreeStore {
    // =========================================================================
    // Directories
    // =========================================================================

    /// Insert a new empty directory under `parent_id`
    ///
    /// The new entry is spliced in at the end of the parent's child run, so
    /// it is listed after the parent's existing children. Returns its id.
    ///
    /// Steps:
    /// 1. Resolve the parent and the split point
    /// 2. Allocate an id
    /// 3. Splice the leaf in; entries from the split point onward shift by one
    /// 4. Bump the parent's child count and the header's directory count
    pub fn add_dir(&mut self, parent_id: DirId, name: impl Into<Name>) -> Result<DirId> {
        // Step 1: Everything that can fail happens before the splice
        let parent_pos = self.position_of(parent_id)?;
        let split = self.child_offset_at(parent_pos) + self.dirs[parent_pos].child_count as usize;
        self.ensure_id_available()?;
        self.dirs.try_reserve(1)?;
        self.index.try_reserve(1)?;

        // Step 2: Allocate
        let id = self.next_id()?;
        let entry = DirEntry::leaf(id, name);
        debug!(id, parent = parent_id, position = split, name = %entry.name, "add_dir");

        // Step 3: Splice. [0, split) stays put, [split, N) moves to [split + 1, N + 1)
        self.dirs.insert(split, entry);
        self.reindex_from(split);

        // Step 4: The parent sits before the split, so its position is unchanged
        self.dirs[parent_pos].child_count += 1;
        self.header.directory_count += 1;

        Ok(id)
    }

    /// Remove a directory that has no child directories
    ///
    /// Its files are handled according to the store's [`FilePolicy`].
    pub fn rem_dir_leaf(&mut self, id: DirId) -> Result<()> {
        let pos = self.position_of(id)?;
        if pos == 0 {
            return Err(FlatTreeError::RootRemoval);
        }

        let dir = &self.dirs[pos];
        if !dir.is_leaf() {
            return Err(FlatTreeError::NotLeaf(id));
        }
        if self.file_policy == FilePolicy::Reject && dir.file_count > 0 {
            return Err(FlatTreeError::DirectoryHasFiles(id));
        }

        self.remove_leaf_at(pos)?;
        Ok(())
    }

    /// Remove a directory together with every descendant
    ///
    /// The end state is the one reached by leaf-deleting the subtree
    /// bottom-up: every subtree entry and its file run is gone and the
    /// target's parent has one child fewer. The subtree is gathered with an
    /// explicit stack and collapsed out of both tables in a single pass, so
    /// neither tree depth nor subtree size costs stack or quadratic time.
    ///
    /// Existence, the root check and the file policy are all settled before
    /// the tables change, so the call removes everything or nothing.
    /// Returns the number of directories removed.
    pub fn rem_dir(&mut self, id: DirId) -> Result<usize> {
        let pos = self.position_of(id)?;
        if pos == 0 {
            return Err(FlatTreeError::RootRemoval);
        }

        let runs = self.run_offsets();
        let subtree = self.subtree_positions(pos, &runs);

        if self.file_policy == FilePolicy::Reject {
            if let Some(&owner) = subtree.iter().find(|&&p| self.dirs[p].file_count > 0) {
                return Err(FlatTreeError::DirectoryHasFiles(self.dirs[owner].id));
            }
        }

        let parent_pos = self.parent_position(pos).ok_or_else(|| {
            FlatTreeError::Corrupt(format!("no parent found for position {}", pos))
        })?;

        let removed = subtree.len();
        let dropped = self.collapse(parent_pos, &subtree, &runs);
        debug!(id, removed, files_dropped = dropped, "rem_dir");
        Ok(removed)
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Append a file to the end of a directory's file run
    pub fn add_file(&mut self, dir_id: DirId, name: impl Into<Name>, size: u32) -> Result<()> {
        let pos = self.position_of(dir_id)?;
        if self.dirs[pos].file_count == u32::MAX {
            return Err(FlatTreeError::AllocationFailure(format!(
                "directory {} cannot hold more files",
                dir_id
            )));
        }
        self.files.try_reserve(1)?;

        let split = self.file_range(pos).end;
        let file = FileEntry::new(name, size);
        debug!(dir = dir_id, position = split, name = %file.name, size, "add_file");

        self.files.insert(split, file);
        self.dirs[pos].file_count += 1;
        self.total_files += 1;
        Ok(())
    }

    /// Remove the `index`-th file of a directory and return it
    pub fn rem_file(&mut self, dir_id: DirId, index: usize) -> Result<FileEntry> {
        let pos = self.position_of(dir_id)?;
        let range = self.file_range(pos);
        if index >= range.len() {
            return Err(FlatTreeError::FileNotFound { dir: dir_id, index });
        }

        let file = self.files.remove(range.start + index);
        self.dirs[pos].file_count -= 1;
        self.total_files -= 1;
        debug!(dir = dir_id, index, name = %file.name, "rem_file");
        Ok(file)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Collapse the leaf at `pos` out of the directory table, dropping its
    /// file run. The caller has already applied the file policy.
    fn remove_leaf_at(&mut self, pos: usize) -> Result<DirEntry> {
        let parent_pos = self.parent_position(pos).ok_or_else(|| {
            FlatTreeError::Corrupt(format!("no parent found for position {}", pos))
        })?;

        let files = self.file_range(pos);
        let dropped = files.len();
        self.files.drain(files);
        self.total_files -= dropped;

        // The parent precedes `pos`, so its position survives the collapse
        self.dirs[parent_pos].child_count -= 1;
        let entry = self.dirs.remove(pos);
        self.index.remove(&entry.id);
        self.reindex_from(pos);
        self.header.directory_count -= 1;

        debug!(id = entry.id, position = pos, files_dropped = dropped, "rem_dir_leaf");
        Ok(entry)
    }

    /// Drop the directories at `doomed` (ascending, a whole subtree) and
    /// their file runs, then shift everything after them down. Returns the
    /// number of files dropped.
    fn collapse(&mut self, parent_pos: usize, doomed: &[usize], runs: &RunOffsets) -> usize {
        let mut drop_dir = vec![false; self.dirs.len()];
        let mut drop_file = vec![false; self.files.len()];
        for &p in doomed {
            drop_dir[p] = true;
            for f in runs.file_range(p, &self.dirs[p]) {
                drop_file[f] = true;
            }
            self.index.remove(&self.dirs[p].id);
        }

        // Only the subtree root's parent survives; it precedes the subtree
        self.dirs[parent_pos].child_count -= 1;

        let mut slot = 0;
        self.dirs.retain(|_| {
            slot += 1;
            !drop_dir[slot - 1]
        });
        let mut slot = 0;
        let before = self.files.len();
        self.files.retain(|_| {
            slot += 1;
            !drop_file[slot - 1]
        });
        let dropped = before - self.files.len();

        self.total_files -= dropped;
        self.header.directory_count -= doomed.len() as u32;
        if let Some(&first) = doomed.first() {
            self.reindex_from(first);
        }
        dropped
    }
}
