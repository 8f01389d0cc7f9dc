//! Database backend seam used by the orchestrator
//!
//! The orchestrator only sees [`MigrationBackend`]; [`PostgresBackend`] wires
//! the connection provider, catalog and executor together behind it.

use async_trait::async_trait;
use sqlgate_core::MigrateConfig;
use std::time::Duration;

use crate::catalog::{Catalog, ColumnInfo};
use crate::connection::ConnectionProvider;
use crate::error::MigrateResult;
use crate::migrations::{MigrationExecutor, MigrationFile};

/// Database operations a migration run depends on.
///
/// Each call is independent and must not keep a session open between calls.
#[async_trait]
pub trait MigrationBackend: Send + Sync {
    /// Round-trip a trivial query
    async fn probe(&self) -> MigrateResult<()>;

    /// Whether `schema.table` exists
    async fn table_exists(&self, schema: &str, table: &str) -> MigrateResult<bool>;

    /// Apply one migration in its own transaction
    async fn apply(&self, migration: &MigrationFile) -> MigrateResult<Duration>;

    /// Columns of `schema.table` in ordinal order
    async fn describe_table(&self, schema: &str, table: &str) -> MigrateResult<Vec<ColumnInfo>>;

    /// Printable connection target
    fn target(&self) -> String;
}

/// PostgreSQL implementation over `sqlx`
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    provider: ConnectionProvider,
    catalog: Catalog,
    executor: MigrationExecutor,
}

impl PostgresBackend {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self {
            catalog: Catalog::new(provider.clone()),
            executor: MigrationExecutor::new(provider.clone()),
            provider,
        }
    }

    /// Build from the run configuration; fails if the connection string is unusable
    pub fn from_config(config: &MigrateConfig) -> MigrateResult<Self> {
        Ok(Self::new(ConnectionProvider::from_config(config)?))
    }
}

#[async_trait]
impl MigrationBackend for PostgresBackend {
    async fn probe(&self) -> MigrateResult<()> {
        self.provider.ping().await
    }

    async fn table_exists(&self, schema: &str, table: &str) -> MigrateResult<bool> {
        self.catalog.table_exists(schema, table).await
    }

    async fn apply(&self, migration: &MigrationFile) -> MigrateResult<Duration> {
        self.executor.apply(migration).await
    }

    async fn describe_table(&self, schema: &str, table: &str) -> MigrateResult<Vec<ColumnInfo>> {
        self.catalog.describe_columns(schema, table).await
    }

    fn target(&self) -> String {
        self.provider.target().to_string()
    }
}
