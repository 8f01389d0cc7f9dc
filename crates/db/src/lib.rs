//! # sqlgate-db: Migration execution for sqlgate
//!
//! Connection acquisition, catalog checks, migration discovery and
//! per-file transactional application, sequenced by [`RunOrchestrator`].
//!
//! Every database-touching step opens its own connection and closes it
//! before returning; nothing is pooled or shared between steps.

pub mod backend;
pub mod catalog;
pub mod connection;
pub mod error;
pub mod migrations;
pub mod orchestrator;

pub use backend::{MigrationBackend, PostgresBackend};
pub use catalog::{Catalog, ColumnInfo};
pub use connection::ConnectionProvider;
pub use error::{MigrateError, MigrateResult};
pub use migrations::{MigrationExecutor, MigrationFile, MigrationLoader};
pub use orchestrator::{
    AutoApprove, ConfirmationGate, GateDecision, RunError, RunEvent, RunOrchestrator, RunOutcome,
    RunReporter, RunSummary, StatusInspector, StatusReport,
};
