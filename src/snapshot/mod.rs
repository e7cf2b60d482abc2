//! Snapshot Module
//!
//! Packed on-disk image of a whole store.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (12 bytes)                                       │
//! │   Magic: "FTRE" (4) | DirCount: u32 (4) | NextId: u32   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Directory Records (44 bytes each, table order)          │
//! │   [Name: 32, NUL padded][Files: u32][Children: u32][Id] │
//! ├─────────────────────────────────────────────────────────┤
//! │ File Records (36 bytes each, table order)               │
//! │   [Name: 32, NUL padded][Size: u32]                     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (4 bytes)                                        │
//! │   CRC32 of every preceding byte                         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. The number of file records is not
//! stored; it is the sum of the directory file counts.

mod reader;
mod writer;

pub use reader::{decode, read_snapshot};
pub use writer::{encode, write_snapshot};

use crate::table::MAX_NAME_LEN;

// =============================================================================
// Shared Constants (used by writer and reader)
// =============================================================================

/// Header size: Magic (4) + DirCount (4) + NextId (4) = 12 bytes
pub const HEADER_SIZE: usize = 12;

/// Directory record: Name (32) + FileCount (4) + ChildCount (4) + Id (4)
pub const DIR_RECORD_SIZE: usize = MAX_NAME_LEN + 12;

/// File record: Name (32) + Size (4)
pub const FILE_RECORD_SIZE: usize = MAX_NAME_LEN + 4;

/// Footer size: CRC32 (4)
pub const FOOTER_SIZE: usize = 4;
