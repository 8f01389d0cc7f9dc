//! Catalog queries against `information_schema`
//!
//! Both checks are read-only and open their own connection.

use serde::Serialize;

use crate::connection::ConnectionProvider;
use crate::error::{is_connection_loss, MigrateError, MigrateResult};

const TABLE_EXISTS_SQL: &str = "SELECT EXISTS (
    SELECT 1 FROM information_schema.tables
    WHERE table_schema::text = $1 AND table_name::text = $2
)";

const DESCRIBE_COLUMNS_SQL: &str = "SELECT column_name::text, data_type::text, is_nullable::text, column_default::text
    FROM information_schema.columns
    WHERE table_schema::text = $1 AND table_name::text = $2
    ORDER BY ordinal_position";

/// One column of the introspected target table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
}

impl std::fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.data_type)?;
        if !self.is_nullable {
            write!(f, " NOT NULL")?;
        }
        if let Some(default) = &self.default {
            write!(f, " DEFAULT {}", default)?;
        }
        Ok(())
    }
}

/// Existence checks and column introspection for the target table
#[derive(Debug, Clone)]
pub struct Catalog {
    provider: ConnectionProvider,
}

impl Catalog {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Whether `schema.table` exists.
    ///
    /// A failed query is an error, never `false`.
    pub async fn table_exists(&self, schema: &str, table: &str) -> MigrateResult<bool> {
        let mut conn = self.provider.acquire().await?;
        let result = sqlx::query_scalar::<_, bool>(TABLE_EXISTS_SQL)
            .bind(schema)
            .bind(table)
            .fetch_one(&mut conn)
            .await;
        self.provider.release(conn).await;

        let exists = result.map_err(|e| self.query_error(e))?;
        tracing::debug!(schema, table, exists, "existence check");
        Ok(exists)
    }

    /// Columns of `schema.table` in ordinal order
    pub async fn describe_columns(&self, schema: &str, table: &str) -> MigrateResult<Vec<ColumnInfo>> {
        let mut conn = self.provider.acquire().await?;
        let result = sqlx::query_as::<_, (String, String, String, Option<String>)>(DESCRIBE_COLUMNS_SQL)
            .bind(schema)
            .bind(table)
            .fetch_all(&mut conn)
            .await;
        self.provider.release(conn).await;

        let rows = result.map_err(|e| self.query_error(e))?;
        Ok(rows
            .into_iter()
            .map(|(name, data_type, is_nullable, default)| ColumnInfo {
                name,
                data_type,
                is_nullable: is_nullable.eq_ignore_ascii_case("YES"),
                default,
            })
            .collect())
    }

    fn query_error(&self, err: sqlx::Error) -> MigrateError {
        if is_connection_loss(&err) {
            MigrateError::Connection {
                target: self.provider.target().to_string(),
                message: err.to_string(),
            }
        } else {
            MigrateError::Catalog(err.to_string())
        }
    }
}
