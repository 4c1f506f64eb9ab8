//! # Storage Layer
//!
//! The catalog is held in memory and only touches storage at startup (load) and shutdown
//! (save). A [`CatalogStore`] hands out and accepts the raw lines of one [`Collection`] at
//! a time; encoding, decoding and skipping bad lines happen in the catalog, so backends
//! stay format-agnostic.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one text file per collection in a data directory
//!   - Whole-file reads, split into lines without decoding
//!   - Writes go to a temp file that is renamed over the target, so a failed save leaves
//!     the previous file in place
//!
//! - [`memory::InMemoryStore`]: line buffers for testing
//!   - Can simulate missing collections and write failures
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── books.csv      # one encoded Book per line
//! ├── users.csv      # one encoded User per line
//! ├── records.csv    # one encoded BorrowRecord per line
//! └── config.json    # LibrisConfig
//! ```
//!
//! There is no transaction across the three files. A crash between writes can leave them
//! out of step with each other.

use crate::error::Result;
use serde::Serialize;
use std::fmt;

pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Books,
    Users,
    Records,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Books, Collection::Users, Collection::Records];
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Books => "books",
            Collection::Users => "users",
            Collection::Records => "records",
        };
        f.write_str(name)
    }
}

/// Line-level persistence for the three catalog collections.
pub trait CatalogStore {
    /// Read every line of a collection as raw bytes, without line terminators. Fails only
    /// if the collection cannot be opened; text decoding is left to the caller, line by line.
    fn read_lines(&self, collection: Collection) -> Result<Vec<Vec<u8>>>;

    /// Replace a collection with the given lines.
    fn write_lines(&mut self, collection: Collection, lines: &[String]) -> Result<()>;
}
