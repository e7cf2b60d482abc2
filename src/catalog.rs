//! Catalog Module
//!
//! Shared, persisted handle around a single [`TreeStore`].
//!
//! ## Responsibilities
//! - Load the snapshot on startup, or start from a fresh root
//! - Serialize every mutation behind one writer lock
//! - Write snapshots on request

use std::path::Path;

use parking_lot::RwLock;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::snapshot;
use crate::table::TreeStore;

/// The store plus its configuration
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** take the one write lock around the whole store. Every insert
///   or delete shifts positions throughout the table, so nothing finer
///   grained is safe.
/// - **Reads** share the read lock. Positions and offsets observed inside a
///   `read` closure are only meaningful inside that closure.
pub struct Catalog {
    config: Config,
    store: RwLock<TreeStore>,
}

impl Catalog {
    /// Open the catalog described by `config`
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Load the snapshot if one exists
    /// 3. Otherwise build a store holding only the root
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let store = if config.snapshot_path.exists() {
            let store = snapshot::read_snapshot(&config.snapshot_path)?
                .with_file_policy(config.file_policy);
            info!(
                path = %config.snapshot_path.display(),
                dirs = store.len(),
                files = store.total_files(),
                next_id = store.header().next_id,
                "loaded snapshot"
            );
            store
        } else {
            info!(
                path = %config.snapshot_path.display(),
                root = %config.root_name,
                "no snapshot found, starting fresh"
            );
            TreeStore::from_config(&config)?
        };

        Ok(Self {
            config,
            store: RwLock::new(store),
        })
    }

    /// Open with a snapshot path (convenience method)
    ///
    /// Uses default config with the specified snapshot location
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().snapshot_path(path).build();
        Self::open(config)
    }

    /// Wrap an existing store; it is saved to the configured path
    pub fn from_store(config: Config, store: TreeStore) -> Self {
        let store = store.with_file_policy(config.file_policy);
        Self {
            config,
            store: RwLock::new(store),
        }
    }

    /// Run `f` with shared access to the store
    pub fn read<T>(&self, f: impl FnOnce(&TreeStore) -> T) -> T {
        f(&self.store.read())
    }

    /// Run `f` with exclusive access to the store
    pub fn write<T>(&self, f: impl FnOnce(&mut TreeStore) -> T) -> T {
        f(&mut self.store.write())
    }

    /// Clone of the current store
    pub fn snapshot(&self) -> TreeStore {
        self.store.read().clone()
    }

    /// Persist the current store to the configured snapshot path
    pub fn save(&self) -> Result<()> {
        let store = self.store.read();
        snapshot::write_snapshot(&store, &self.config.snapshot_path, self.config.sync_on_save)?;
        info!(
            path = %self.config.snapshot_path.display(),
            dirs = store.len(),
            files = store.total_files(),
            "saved snapshot"
        );
        Ok(())
    }

    /// Save and consume the catalog
    pub fn close(self) -> Result<()> {
        self.save()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.config.snapshot_path
    }

    /// Number of directories currently stored
    pub fn dir_count(&self) -> usize {
        self.store.read().len()
    }

    /// Number of files currently stored
    pub fn file_count(&self) -> usize {
        self.store.read().total_files()
    }
}
