//! Error types for migration discovery and execution

use sqlgate_core::ConfigError;
use std::path::PathBuf;

/// Result alias for database and migration operations
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Errors raised by the connection provider, catalog, loader and executor.
///
/// Connectivity problems are kept apart from statement failures so the
/// orchestrator can stop on the former without blaming a migration file.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid connection string for {target}: {message}")]
    InvalidUrl { target: String, message: String },

    #[error("Database connection failed ({target}): {message}")]
    Connection { target: String, message: String },

    #[error("Catalog query failed: {0}")]
    Catalog(String),

    #[error("Migrations directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration {migration} failed: {message}")]
    Execution { migration: String, message: String },

    #[error("Transaction error in {migration}: {message}")]
    Transaction { migration: String, message: String },
}

impl MigrateError {
    /// Build an I/O error tied to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the failure is about reaching the database at all
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::InvalidUrl { .. })
    }
}

/// Classify a driver error raised while talking to an open connection.
///
/// I/O, TLS and pool failures mean the session itself is gone.
pub(crate) fn is_connection_loss(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}
