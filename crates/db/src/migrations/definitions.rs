//! Migration Definitions - the unit of work applied by the executor

use std::path::PathBuf;

/// A migration payload read from disk.
///
/// `name` is the file name and the only ordering key. The payload is opaque
/// SQL text and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// File name, e.g. `001_init.sql`
    pub name: String,
    /// Full path the payload was read from
    pub path: PathBuf,
    /// SQL statements, executed as one batch
    pub payload: String,
}

impl MigrationFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, payload: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            payload: payload.into(),
        }
    }

    /// True when the payload holds nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.payload.trim().is_empty()
    }
}
