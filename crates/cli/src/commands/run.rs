use sqlgate_core::MigrateConfig;
use sqlgate_db::{
    AutoApprove, ConfirmationGate, PostgresBackend, RunError, RunOrchestrator, RunOutcome,
};
use std::process::ExitCode;

use crate::interactive::PromptGate;
use crate::report::ConsoleReporter;

/// Apply every migration file, gated and verified
pub async fn execute(config: &MigrateConfig) -> ExitCode {
    let reporter = ConsoleReporter;
    reporter.banner();

    // Checked before the backend exists so a bad config never opens a socket
    if let Err(e) = config.validate() {
        return fail(&reporter, RunError::from(e));
    }

    let backend = match PostgresBackend::from_config(config) {
        Ok(backend) => backend,
        Err(e) => return fail(&reporter, RunError::from(e)),
    };

    let gate: &dyn ConfirmationGate = if config.force { &AutoApprove } else { &PromptGate };

    match RunOrchestrator::new(config, &backend, gate, &reporter).run().await {
        Ok(RunOutcome::Completed(summary)) => {
            reporter.summary(&summary);
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Declined { table }) => {
            tracing::info!(table = %table, "run declined at existence gate");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&reporter, e),
    }
}

fn fail(reporter: &ConsoleReporter, err: RunError) -> ExitCode {
    tracing::error!(category = err.category(), error = %err, "migration run failed");
    reporter.failure(&err);
    ExitCode::from(err.exit_code())
}
