//! # flattree
//!
//! A compact in-memory directory index with:
//! - Two flat tables (directories, files) and no stored pointers
//! - Tree shape encoded purely by table order plus per-entry counts
//! - All-or-nothing inserts and deletes
//! - A packed, checksummed snapshot format
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      flattree-cli                            │
//! │               (seed / ls / mkdir / rmdir)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Catalog                                │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  TreeStore  │ ◄──────► │  Snapshot   │
//!   │ dirs, files │          │ (CRC32)     │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod snapshot;
pub mod catalog;
pub mod seed;
pub mod render;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlatTreeError, Result};
pub use config::{Config, FilePolicy};
pub use catalog::Catalog;
pub use table::{DirEntry, DirId, FileEntry, Header, Name, TreeStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of flattree
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
