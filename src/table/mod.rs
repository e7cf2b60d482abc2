//! Table Module
//!
//! The directory index: a header plus two flat tables that encode the
//! directory tree without any parent or child pointers.
//!
//! ## Encoding
//! ```text
//! dirs:  [ root | img  docs | 2009 2010 2011 | resume work life ]
//!          0      1    2      3    4    5      6      7    8
//!                 └root's─┘   └──img's──────┘  └──docs's───────┘
//!                 children     children          children
//!
//! files: [ manifest.txt | 1.jpg 2.jpg | diary.txt ]
//!          docs           2011          life
//! ```
//!
//! - Directory at position P has its children at
//!   `1 + Σ child_count[0..P]`, for `child_count[P]` slots
//! - Directory at position P has its files at
//!   `Σ file_count[0..P]`, for `file_count[P]` slots
//! - Position 0 is the root; every child run starts after its parent
//!
//! Ids are stable for the lifetime of an entry; positions are not.

mod entry;
mod mutation;
mod store;

pub use entry::{DirEntry, FileEntry, Header, Name};
pub use store::TreeStore;

/// Identifier of a directory, stable across mutations
pub type DirId = u32;

/// Magic tag carried in the header
pub const MAGIC: &[u8; 4] = b"FTRE";

/// Maximum name length in bytes (names are truncated beyond this)
pub const MAX_NAME_LEN: usize = 32;
