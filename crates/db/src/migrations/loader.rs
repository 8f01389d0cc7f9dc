//! Migration Loader - discovers migration files on disk
//!
//! Only the top level of the directory is scanned. Files are ordered by
//! file name, byte-wise ascending, so `001_init.sql` always precedes
//! `002_add_index.sql` whatever order the filesystem returns them in.

use std::fs;
use std::path::{Path, PathBuf};

use super::definitions::MigrationFile;
use crate::error::{MigrateError, MigrateResult};

const MIGRATION_EXTENSION: &str = "sql";

/// Loads migration payloads from a single directory
#[derive(Debug, Clone)]
pub struct MigrationLoader {
    directory: PathBuf,
}

impl MigrationLoader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Read every `.sql` file in name order.
    ///
    /// An empty result is not an error here. A missing directory is.
    pub fn discover(&self) -> MigrateResult<Vec<MigrationFile>> {
        let mut paths = self.list_paths()?;
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        let mut migrations = Vec::with_capacity(paths.len());
        for path in paths {
            migrations.push(self.read_migration(&path)?);
        }

        tracing::debug!(
            directory = %self.directory.display(),
            count = migrations.len(),
            "migrations discovered"
        );
        Ok(migrations)
    }

    /// File names in the order they would be applied, without reading payloads
    pub fn list_names(&self) -> MigrateResult<Vec<String>> {
        let mut names: Vec<String> = self
            .list_paths()?
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    fn list_paths(&self) -> MigrateResult<Vec<PathBuf>> {
        if !self.directory.is_dir() {
            return Err(MigrateError::MissingDirectory(self.directory.clone()));
        }

        let entries =
            fs::read_dir(&self.directory).map_err(|e| MigrateError::io(&self.directory, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MigrateError::io(&self.directory, e))?;
            let path = entry.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == MIGRATION_EXTENSION) {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    fn read_migration(&self, path: &Path) -> MigrateResult<MigrationFile> {
        let payload = fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::trace!(migration = %name, bytes = payload.len(), "migration read");
        Ok(MigrationFile::new(name, path, payload))
    }
}
