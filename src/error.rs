//! Error types for flattree
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::table::DirId;

/// Result type alias using FlatTreeError
pub type Result<T> = std::result::Result<T, FlatTreeError>;

/// Unified error type for flattree operations
#[derive(Debug, Error)]
pub enum FlatTreeError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Directory not found: id {0}")]
    NotFound(DirId),

    #[error("File not found: directory {dir} has no file at index {index}")]
    FileNotFound { dir: DirId, index: usize },

    // -------------------------------------------------------------------------
    // Mutation Errors
    // -------------------------------------------------------------------------
    #[error("Table allocation failed: {0}")]
    AllocationFailure(String),

    #[error("Directory {0} still has child directories")]
    NotLeaf(DirId),

    #[error("Directory {0} still owns files")]
    DirectoryHasFiles(DirId),

    #[error("The root directory cannot be removed")]
    RootRemoval,

    #[error("Directory id space exhausted")]
    IdSpaceExhausted,

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt table: {0}")]
    Corrupt(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::collections::TryReserveError> for FlatTreeError {
    fn from(e: std::collections::TryReserveError) -> Self {
        FlatTreeError::AllocationFailure(e.to_string())
    }
}
