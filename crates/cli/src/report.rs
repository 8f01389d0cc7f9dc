//! Operator-facing progress output

use console::style;
use sqlgate_db::orchestrator::CheckStage;
use sqlgate_db::{RunError, RunEvent, RunReporter, RunSummary, StatusReport};
use std::time::Duration;

const RULE: &str = "==================================================";

/// Prints run progress to the terminal
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn banner(&self) {
        println!("🚀 {}", style("Starting database migration").bold());
        println!("{}", RULE);
    }

    pub fn summary(&self, summary: &RunSummary) {
        println!();
        println!("{}", RULE);
        println!("🎉 {}", style("Migration completed successfully!").green().bold());
        println!(
            "✅ {}/{} migrations applied in {}",
            summary.applied.len(),
            summary.total,
            format_duration(summary.elapsed)
        );
        println!(
            "   started {}",
            style(summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")).dim()
        );
    }

    pub fn failure(&self, err: &RunError) {
        eprintln!();
        eprintln!(
            "❌ {} {}",
            style(format!("Run failed ({}):", err.category())).red().bold(),
            err
        );
        if let RunError::Precondition(message) = err {
            if message.contains("POSTGRES_URL") {
                eprintln!("   Set it with: export POSTGRES_URL='postgresql://...'");
            }
        }
    }

    pub fn status(&self, report: &StatusReport) {
        println!("📋 {}", style("Migration status").bold());
        println!("{}", RULE);
        println!("   target:    {}", style(&report.target).yellow());
        println!("   table:     {}.{}", report.schema, report.table);

        let status = report.migration_status();
        let styled = match status {
            "completed" => style(status).green(),
            "pending" => style(status).yellow(),
            _ => style(status).red(),
        };
        println!("   status:    {}", styled);
        if let Some(error) = &report.existence_error {
            println!("   ⚠️  existence check failed: {}", error);
        }

        println!(
            "   directory: {} ({} file(s))",
            report.directory.display(),
            report.migrations.len()
        );
        for (i, name) in report.migrations.iter().enumerate() {
            println!("     {} {}", style(format!("{:>3}.", i + 1)).dim(), name);
        }
    }
}

impl RunReporter for ConsoleReporter {
    fn report(&self, event: &RunEvent) {
        match event {
            RunEvent::Started { target, directory } => {
                println!("🔌 Testing database connection to {}...", style(target).yellow());
                tracing::debug!(directory = %directory.display(), "run started");
            }
            RunEvent::Connected => println!("✅ Database connection successful"),
            RunEvent::TableAbsent { table } => {
                println!("   Table {} not found, migrations will create it", style(table).cyan());
            }
            RunEvent::TableExists { table } => {
                println!("⚠️  {} table already exists", style(table).cyan());
                println!("   Migration may have been run before");
            }
            RunEvent::ExistenceCheckFailed { stage, message } => match stage {
                CheckStage::PreCheck => {
                    println!("⚠️  Cannot check table existence: {}", message);
                    println!("   Continuing without the existence gate");
                }
                CheckStage::PostCheck => {
                    println!("⚠️  Cannot verify table existence: {}", message);
                }
            },
            RunEvent::Declined { table } => {
                println!("Migration cancelled, {} left untouched", table);
            }
            RunEvent::Discovered { count } => println!("📂 Found {} migration(s)", count),
            RunEvent::Applying { index, total, name } => {
                println!(
                    "📄 {} Running migration: {}",
                    style(format!("[{}/{}]", index, total)).cyan(),
                    name
                );
            }
            RunEvent::Applied { name, elapsed } => {
                println!(
                    "✅ Migration completed: {} {}",
                    name,
                    style(format!("({})", format_duration(*elapsed))).dim()
                );
            }
            RunEvent::ApplyFailed { name, message } => {
                eprintln!("❌ Migration failed: {}", style(name).red());
                eprintln!("   Error: {}", message);
            }
            RunEvent::Verified { table } => {
                println!();
                println!("🔍 Verification: {} table present", style(table).cyan());
            }
            RunEvent::Columns { table, columns } => {
                println!("📊 Table structure of {}:", table);
                for column in columns {
                    println!("  • {}", column);
                }
            }
            RunEvent::IntrospectionFailed { message } => {
                println!("⚠️  Could not read table structure: {}", message);
            }
            RunEvent::Finished { .. } => {}
        }
    }
}

/// Compact human duration, e.g. `12ms` or `1.42s`
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
