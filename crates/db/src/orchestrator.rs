//! Run Orchestrator - the migration run state machine
//!
//! Steps, each a precondition for the next:
//!
//! 1. configuration check
//! 2. connectivity probe
//! 3. existence pre-check, with operator confirmation if the table is present
//! 4. discovery of migration files
//! 5. sequential application, stopping at the first failure
//! 6. post-verification of the target table
//! 7. best-effort column report
//!
//! Components return `Result`s; only this module decides whether the run
//! continues. Progress is pushed to a [`RunReporter`] and the operator's
//! answer comes from a [`ConfirmationGate`], so both can be swapped out.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlgate_core::{ConfigError, MigrateConfig};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::backend::MigrationBackend;
use crate::catalog::ColumnInfo;
use crate::error::MigrateError;
use crate::migrations::MigrationLoader;

/// Operator answer at the existence gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Abort,
    /// No answer could be read, e.g. stdin closed without a terminal
    Unavailable,
}

/// Asks whether to continue when the target table already exists
pub trait ConfirmationGate: Send + Sync {
    fn confirm(&self, schema: &str, table: &str) -> GateDecision;
}

/// Gate that always proceeds, used for `--force`
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl ConfirmationGate for AutoApprove {
    fn confirm(&self, schema: &str, table: &str) -> GateDecision {
        tracing::info!(schema, table, "existence gate skipped by --force");
        GateDecision::Proceed
    }
}

/// Which existence check an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStage {
    PreCheck,
    PostCheck,
}

/// Progress notifications emitted during a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Started { target: String, directory: PathBuf },
    Connected,
    TableAbsent { table: String },
    TableExists { table: String },
    ExistenceCheckFailed { stage: CheckStage, message: String },
    Declined { table: String },
    Discovered { count: usize },
    Applying { index: usize, total: usize, name: String },
    Applied { name: String, elapsed: Duration },
    ApplyFailed { name: String, message: String },
    Verified { table: String },
    Columns { table: String, columns: Vec<ColumnInfo> },
    IntrospectionFailed { message: String },
    Finished { applied: usize, total: usize, elapsed: Duration },
}

/// Receives [`RunEvent`]s as the run progresses
pub trait RunReporter: Send + Sync {
    fn report(&self, event: &RunEvent);
}

/// A migration that was committed
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedMigration {
    pub name: String,
    pub elapsed: Duration,
}

/// Result of a run that reached verification successfully
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub applied: Vec<AppliedMigration>,
    pub total: usize,
    /// `None` when introspection failed; the run still succeeded
    pub columns: Option<Vec<ColumnInfo>>,
    pub elapsed: Duration,
}

/// Non-failing ends of a run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every migration applied and the target table verified
    Completed(RunSummary),
    /// The table already existed and the operator chose not to continue
    Declined { table: String },
}

/// Terminal failures of a run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("{0}")]
    Precondition(String),

    #[error("{0}")]
    Connectivity(String),

    #[error("{message} ({applied}/{total} migrations applied before {migration})")]
    Execution {
        migration: String,
        message: String,
        applied: usize,
        total: usize,
    },

    #[error("{0}")]
    Verification(String),
}

impl RunError {
    /// Short label for the failure class
    pub fn category(&self) -> &'static str {
        match self {
            RunError::Precondition(_) => "precondition",
            RunError::Connectivity(_) => "connectivity",
            RunError::Execution { .. } => "execution",
            RunError::Verification(_) => "verification",
        }
    }

    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Precondition(_) => 2,
            RunError::Connectivity(_) => 3,
            RunError::Execution { .. } => 4,
            RunError::Verification(_) => 5,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        RunError::Precondition(err.to_string())
    }
}

impl From<MigrateError> for RunError {
    fn from(err: MigrateError) -> Self {
        match err {
            MigrateError::Config(config) => config.into(),
            err if err.is_connectivity() => RunError::Connectivity(err.to_string()),
            MigrateError::MissingDirectory(_) | MigrateError::Io { .. } => {
                RunError::Precondition(err.to_string())
            }
            MigrateError::Catalog(message) => {
                RunError::Verification(format!("Catalog query failed: {}", message))
            }
            MigrateError::Execution { migration, message }
            | MigrateError::Transaction { migration, message } => RunError::Execution {
                migration,
                message,
                applied: 0,
                total: 0,
            },
            other => RunError::Precondition(other.to_string()),
        }
    }
}

/// Read-only snapshot used by the `status` command
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub target: String,
    pub schema: String,
    pub table: String,
    /// `None` when the existence check itself failed
    pub table_exists: Option<bool>,
    pub existence_error: Option<String>,
    pub directory: PathBuf,
    /// Files in the order they would be applied
    pub migrations: Vec<String>,
}

impl StatusReport {
    /// `completed`, `pending` or `unknown`
    pub fn migration_status(&self) -> &'static str {
        match self.table_exists {
            Some(true) => "completed",
            Some(false) => "pending",
            None => "unknown",
        }
    }
}

/// Sequences a single migration run
pub struct RunOrchestrator<'a> {
    config: &'a MigrateConfig,
    backend: &'a dyn MigrationBackend,
    loader: MigrationLoader,
    gate: &'a dyn ConfirmationGate,
    reporter: &'a dyn RunReporter,
}

impl<'a> RunOrchestrator<'a> {
    pub fn new(
        config: &'a MigrateConfig,
        backend: &'a dyn MigrationBackend,
        gate: &'a dyn ConfirmationGate,
        reporter: &'a dyn RunReporter,
    ) -> Self {
        Self {
            config,
            backend,
            loader: MigrationLoader::new(&config.migrations_dir),
            gate,
            reporter,
        }
    }

    /// Execute the full run.
    ///
    /// `Ok` covers both a verified run and an operator-declined run;
    /// every other ending is a [`RunError`].
    pub async fn run(&self) -> Result<RunOutcome, RunError> {
        let started = Instant::now();
        let started_at = Utc::now();
        let schema = self.config.schema.as_str();
        let table = self.config.target_table.as_str();

        self.config.validate()?;

        self.reporter.report(&RunEvent::Started {
            target: self.backend.target(),
            directory: self.loader.directory().to_path_buf(),
        });

        self.backend.probe().await.map_err(RunError::from)?;
        self.reporter.report(&RunEvent::Connected);

        match self.backend.table_exists(schema, table).await {
            Ok(true) => {
                self.reporter.report(&RunEvent::TableExists {
                    table: table.to_string(),
                });
                match self.gate.confirm(schema, table) {
                    GateDecision::Proceed => {}
                    GateDecision::Abort => {
                        self.reporter.report(&RunEvent::Declined {
                            table: table.to_string(),
                        });
                        return Ok(RunOutcome::Declined {
                            table: table.to_string(),
                        });
                    }
                    GateDecision::Unavailable => {
                        return Err(RunError::Precondition(format!(
                            "Table {}.{} already exists and no confirmation could be read; rerun with --force to continue",
                            schema, table
                        )));
                    }
                }
            }
            Ok(false) => self.reporter.report(&RunEvent::TableAbsent {
                table: table.to_string(),
            }),
            Err(e) if e.is_connectivity() => return Err(RunError::Connectivity(e.to_string())),
            Err(e) => {
                tracing::warn!(error = %e, "existence pre-check failed, continuing");
                self.reporter.report(&RunEvent::ExistenceCheckFailed {
                    stage: CheckStage::PreCheck,
                    message: e.to_string(),
                });
            }
        }

        let migrations = self.loader.discover().map_err(RunError::from)?;
        if migrations.is_empty() {
            return Err(RunError::Precondition(format!(
                "No migration files found in {}",
                self.loader.directory().display()
            )));
        }
        let total = migrations.len();
        self.reporter.report(&RunEvent::Discovered { count: total });

        let mut applied = Vec::with_capacity(total);
        for (i, migration) in migrations.iter().enumerate() {
            self.reporter.report(&RunEvent::Applying {
                index: i + 1,
                total,
                name: migration.name.clone(),
            });

            match self.backend.apply(migration).await {
                Ok(elapsed) => {
                    self.reporter.report(&RunEvent::Applied {
                        name: migration.name.clone(),
                        elapsed,
                    });
                    applied.push(AppliedMigration {
                        name: migration.name.clone(),
                        elapsed,
                    });
                }
                Err(e) => {
                    self.reporter.report(&RunEvent::ApplyFailed {
                        name: migration.name.clone(),
                        message: e.to_string(),
                    });
                    if e.is_connectivity() {
                        return Err(RunError::Connectivity(e.to_string()));
                    }
                    return Err(RunError::Execution {
                        migration: migration.name.clone(),
                        message: e.to_string(),
                        applied: applied.len(),
                        total,
                    });
                }
            }
        }

        self.verify(schema, table).await?;
        let columns = self.describe(schema, table).await;

        let elapsed = started.elapsed();
        self.reporter.report(&RunEvent::Finished {
            applied: applied.len(),
            total,
            elapsed,
        });

        Ok(RunOutcome::Completed(RunSummary {
            started_at,
            applied,
            total,
            columns,
            elapsed,
        }))
    }

    async fn verify(&self, schema: &str, table: &str) -> Result<(), RunError> {
        match self.backend.table_exists(schema, table).await {
            Ok(true) => {
                self.reporter.report(&RunEvent::Verified {
                    table: table.to_string(),
                });
                Ok(())
            }
            Ok(false) => Err(RunError::Verification(format!(
                "All migrations reported success but table {}.{} does not exist",
                schema, table
            ))),
            Err(e) if e.is_connectivity() => Err(RunError::Connectivity(e.to_string())),
            Err(e) => {
                self.reporter.report(&RunEvent::ExistenceCheckFailed {
                    stage: CheckStage::PostCheck,
                    message: e.to_string(),
                });
                Err(RunError::Verification(format!(
                    "Could not confirm that table {}.{} exists: {}",
                    schema, table, e
                )))
            }
        }
    }

    async fn describe(&self, schema: &str, table: &str) -> Option<Vec<ColumnInfo>> {
        match self.backend.describe_table(schema, table).await {
            Ok(columns) => {
                self.reporter.report(&RunEvent::Columns {
                    table: table.to_string(),
                    columns: columns.clone(),
                });
                Some(columns)
            }
            Err(e) => {
                tracing::warn!(error = %e, "column introspection failed");
                self.reporter.report(&RunEvent::IntrospectionFailed {
                    message: e.to_string(),
                });
                None
            }
        }
    }
}

/// Read-only view of a run's preconditions, used by the `status` command
pub struct StatusInspector<'a> {
    config: &'a MigrateConfig,
    backend: &'a dyn MigrationBackend,
    loader: MigrationLoader,
}

impl<'a> StatusInspector<'a> {
    pub fn new(config: &'a MigrateConfig, backend: &'a dyn MigrationBackend) -> Self {
        Self {
            config,
            backend,
            loader: MigrationLoader::new(&config.migrations_dir),
        }
    }

    /// Report configuration, connectivity, table presence and pending files
    /// without applying anything.
    pub async fn inspect(&self) -> Result<StatusReport, RunError> {
        let schema = self.config.schema.as_str();
        let table = self.config.target_table.as_str();

        self.config.validate()?;
        self.backend.probe().await.map_err(RunError::from)?;

        let (table_exists, existence_error) = match self.backend.table_exists(schema, table).await {
            Ok(exists) => (Some(exists), None),
            Err(e) if e.is_connectivity() => return Err(RunError::Connectivity(e.to_string())),
            Err(e) => (None, Some(e.to_string())),
        };

        let migrations = self.loader.list_names().map_err(RunError::from)?;

        Ok(StatusReport {
            target: self.backend.target(),
            schema: schema.to_string(),
            table: table.to_string(),
            table_exists,
            existence_error,
            directory: self.loader.directory().to_path_buf(),
            migrations,
        })
    }
}
