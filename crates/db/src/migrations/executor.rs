//! Migration Executor - applies one migration file atomically
//!
//! Each file gets a fresh connection and a single transaction. The payload
//! is sent as one simple-query batch, so multi-statement files run as a unit
//! and a failure anywhere rolls back the whole file.

use sqlx::postgres::PgConnection;
use sqlx::{Connection, Executor};
use std::time::{Duration, Instant};

use super::definitions::MigrationFile;
use crate::connection::ConnectionProvider;
use crate::error::{is_connection_loss, MigrateError, MigrateResult};

/// Applies migration files against the configured database
#[derive(Debug, Clone)]
pub struct MigrationExecutor {
    provider: ConnectionProvider,
}

impl MigrationExecutor {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Apply `migration` and commit, returning how long it took.
    ///
    /// Nothing from the file persists unless every statement succeeds.
    pub async fn apply(&self, migration: &MigrationFile) -> MigrateResult<Duration> {
        let started = Instant::now();
        let mut conn = self.provider.acquire().await?;

        let result = self.run_in_transaction(&mut conn, migration).await;
        self.provider.release(conn).await;
        result?;

        let elapsed = started.elapsed();
        tracing::info!(
            migration = %migration.name,
            elapsed_ms = elapsed.as_millis() as u64,
            "migration committed"
        );
        Ok(elapsed)
    }

    async fn run_in_transaction(
        &self,
        conn: &mut PgConnection,
        migration: &MigrationFile,
    ) -> MigrateResult<()> {
        let mut transaction = conn
            .begin()
            .await
            .map_err(|e| self.driver_error(migration, "begin", e))?;

        if migration.is_blank() {
            tracing::warn!(migration = %migration.name, "migration file is empty, nothing to execute");
        } else {
            // `&str` goes through the simple query protocol, which accepts
            // several statements in one message.
            if let Err(e) = (&mut *transaction).execute(migration.payload.as_str()).await {
                if let Err(rollback_err) = transaction.rollback().await {
                    tracing::debug!(
                        migration = %migration.name,
                        error = %rollback_err,
                        "explicit rollback failed, server discards the transaction on disconnect"
                    );
                }
                return Err(self.driver_error(migration, "execute", e));
            }
        }

        transaction
            .commit()
            .await
            .map_err(|e| self.driver_error(migration, "commit", e))
    }

    fn driver_error(&self, migration: &MigrationFile, stage: &str, err: sqlx::Error) -> MigrateError {
        if is_connection_loss(&err) {
            return MigrateError::Connection {
                target: self.provider.target().to_string(),
                message: format!("lost during {} of {}: {}", stage, migration.name, err),
            };
        }

        match stage {
            "execute" => MigrateError::Execution {
                migration: migration.name.clone(),
                message: describe_database_error(&err),
            },
            _ => MigrateError::Transaction {
                migration: migration.name.clone(),
                message: format!("{} failed: {}", stage, describe_database_error(&err)),
            },
        }
    }
}

/// Database error text including SQLSTATE when the server sent one
fn describe_database_error(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => format!("{} (SQLSTATE {})", db_err.message(), code),
            None => db_err.message().to_string(),
        },
        other => other.to_string(),
    }
}
