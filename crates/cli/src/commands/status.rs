use sqlgate_core::MigrateConfig;
use sqlgate_db::{PostgresBackend, RunError, StatusInspector, StatusReport};
use std::process::ExitCode;

use crate::report::ConsoleReporter;

/// Show whether the target table exists and which files would run
pub async fn execute(config: &MigrateConfig, json: bool) -> ExitCode {
    let reporter = ConsoleReporter;

    let report = match collect(config).await {
        Ok(report) => report,
        Err(e) => {
            reporter.failure(&e);
            return ExitCode::from(e.exit_code());
        }
    };

    if json {
        match render_json(config, &report) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                eprintln!("Failed to serialize status: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        reporter.status(&report);
    }

    ExitCode::SUCCESS
}

async fn collect(config: &MigrateConfig) -> Result<StatusReport, RunError> {
    config.validate()?;
    let backend = PostgresBackend::from_config(config)?;
    StatusInspector::new(config, &backend).inspect().await
}

fn render_json(config: &MigrateConfig, report: &StatusReport) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(report)?;
    value["migration_status"] = serde_json::json!(report.migration_status());
    value["config_sources"] = config
        .config_sources()
        .iter()
        .map(|(key, source)| (key.to_string(), serde_json::json!(source.description())))
        .collect::<serde_json::Map<_, _>>()
        .into();
    serde_json::to_string_pretty(&value)
}
