//! Configuration for flattree
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{FlatTreeError, Result};
use crate::table::DirId;

/// Main configuration for a flattree catalog
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Tree Configuration
    // -------------------------------------------------------------------------
    /// Name given to the root directory of a fresh store
    pub root_name: String,

    /// Id assigned to the root of a fresh store.
    /// Ids handed out afterwards start at `first_id + 1`.
    pub first_id: DirId,

    /// What happens to a directory's files when the directory is deleted
    pub file_policy: FilePolicy,

    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// Location of the on-disk snapshot
    pub snapshot_path: PathBuf,

    /// fsync the snapshot before it replaces the previous one
    pub sync_on_save: bool,
}

/// Policy for files owned by a directory that is being removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilePolicy {
    /// Remove the directory's files along with it
    #[default]
    Discard,

    /// Refuse to remove a directory (or subtree) that still owns files
    Reject,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            first_id: 0,
            file_policy: FilePolicy::Discard,
            snapshot_path: PathBuf::from("./flattree.snap"),
            sync_on_save: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that a fresh store can be built from this config
    pub fn validate(&self) -> Result<()> {
        if self.root_name.is_empty() {
            return Err(FlatTreeError::Config(
                "root name must not be empty".to_string(),
            ));
        }
        if self.first_id >= DirId::MAX - 1 {
            return Err(FlatTreeError::Config(format!(
                "first id {} leaves no room for further ids",
                self.first_id
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the root directory name
    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.config.root_name = name.into();
        self
    }

    /// Set the id of the root directory
    pub fn first_id(mut self, id: DirId) -> Self {
        self.config.first_id = id;
        self
    }

    /// Set the file policy applied on directory removal
    pub fn file_policy(mut self, policy: FilePolicy) -> Self {
        self.config.file_policy = policy;
        self
    }

    /// Set the snapshot file location
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.snapshot_path = path.into();
        self
    }

    /// Enable or disable fsync on save
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.config.sync_on_save = sync;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
