//! Connection Provider - opens one short-lived PostgreSQL session per step
//!
//! There is no pool and no retry: a step that cannot reach the database
//! reports it and the run stops.

use sqlgate_core::config::mask_password;
use sqlgate_core::MigrateConfig;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::str::FromStr;
use std::time::Instant;

use crate::error::{MigrateError, MigrateResult};

/// Produces fresh connections to the configured database
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    options: PgConnectOptions,
    target: String,
}

impl ConnectionProvider {
    /// Resolve the connection target from the run configuration
    pub fn from_config(config: &MigrateConfig) -> MigrateResult<Self> {
        let url = config.database_url()?;
        Self::from_url(url)
    }

    /// Resolve the connection target from a raw connection string
    pub fn from_url(url: &str) -> MigrateResult<Self> {
        let target = mask_password(url);
        let options = PgConnectOptions::from_str(url).map_err(|e| MigrateError::InvalidUrl {
            target: target.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { options, target })
    }

    /// Connection target with the password masked
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Open a new connection. The caller owns it and must [`release`](Self::release) it.
    pub async fn acquire(&self) -> MigrateResult<PgConnection> {
        let started = Instant::now();
        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| MigrateError::Connection {
                target: self.target.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            db = %self.target,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "connection acquired"
        );
        Ok(conn)
    }

    /// Close a connection, logging instead of failing if the server is already gone
    pub async fn release(&self, conn: PgConnection) {
        if let Err(e) = conn.close().await {
            tracing::debug!(db = %self.target, error = %e, "connection close failed");
        }
    }

    /// Trivial round-trip query proving the target accepts sessions
    pub async fn ping(&self) -> MigrateResult<()> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&mut conn)
            .await;
        self.release(conn).await;

        match result {
            Ok(1) => Ok(()),
            Ok(other) => Err(MigrateError::Connection {
                target: self.target.clone(),
                message: format!("probe query returned {} instead of 1", other),
            }),
            Err(e) => Err(MigrateError::Connection {
                target: self.target.clone(),
                message: e.to_string(),
            }),
        }
    }
}
