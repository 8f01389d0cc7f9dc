mod commands;
mod interactive;
mod report;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use sqlgate_core::{init_logging, LoggingConfig, MigrateConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sqlgate", version)]
#[command(about = "Apply ordered SQL migrations to PostgreSQL with pre-flight checks and verification")]
#[command(long_about = "Apply ordered SQL migrations to PostgreSQL with pre-flight checks and verification.\n\n\
    The connection string is read from POSTGRES_URL (a .env file in the working directory is honoured). \
    Running without a subcommand is the same as `sqlgate run`.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Args, Debug, Default)]
struct GlobalOptions {
    /// Directory containing the .sql migration files [env: SQLGATE_MIGRATIONS_DIR] [default: migrations]
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Table whose presence marks the migrations as applied [env: SQLGATE_TABLE] [default: sessions]
    #[arg(long, global = true)]
    table: Option<String>,

    /// Schema containing the target table [env: SQLGATE_SCHEMA] [default: public]
    #[arg(long, global = true)]
    schema: Option<String>,

    /// Continue without asking when the target table already exists [env: SQLGATE_FORCE]
    #[arg(long, global = true)]
    force: bool,

    /// Diagnostic log level: error, warn, info, debug, trace [env: SQLGATE_LOG] [default: warn]
    #[arg(long, global = true)]
    log: Option<String>,

    /// Diagnostic log format: plain or json [env: SQLGATE_LOG_FORMAT] [default: plain]
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Check the database, confirm if needed, apply all migrations and verify
    Run,

    /// Report connectivity, target table presence and the files that would run
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl GlobalOptions {
    /// Layer command line flags over the environment-derived configuration
    fn apply(self, mut config: MigrateConfig) -> MigrateConfig {
        if let Some(dir) = self.dir {
            config = config.with_migrations_dir(dir);
        }
        if let Some(table) = self.table {
            config = config.with_target_table(table);
        }
        if let Some(schema) = self.schema {
            config = config.with_schema(schema);
        }
        if self.force {
            config = config.with_force(true);
        }
        if let Some(level) = self.log {
            config = config.with_log_level(level);
        }
        if let Some(format) = self.log_format {
            config = config.with_log_format(format);
        }
        config
    }
}

fn load_config(options: GlobalOptions) -> anyhow::Result<MigrateConfig> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(anyhow!(e)).context("failed to read .env file");
        }
    }

    let config = MigrateConfig::from_env().context("invalid environment configuration")?;
    Ok(options.apply(config))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run);

    let config = match load_config(cli.options) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(LoggingConfig::from(&config))
        .map_err(|e| anyhow!(e))
        .context("failed to initialize logging")
    {
        eprintln!("⚠️  {:#}", e);
    }

    match command {
        Commands::Run => commands::run::execute(&config).await,
        Commands::Status { json } => commands::status::execute(&config, json).await,
    }
}
