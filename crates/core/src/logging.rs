//! # Logging setup
//!
//! Diagnostic tracing for sqlgate. Operator-facing progress lines are printed
//! by the CLI reporter; tracing output goes to stderr and stays at `warn`
//! unless raised with `--log`, `SQLGATE_LOG` or `RUST_LOG`. `--log-format json`
//! or `SQLGATE_LOG_FORMAT=json` switches it to JSON lines.

use crate::config::MigrateConfig;
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration for the migration runner
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// Emit JSON lines instead of plain text
    pub json_format: bool,
    /// Explicit filter directive, takes precedence over `level`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Plain-text logging scoped to the sqlgate crates at the given level
    pub fn for_level(level: &str) -> Self {
        Self {
            level: level.to_string(),
            env_filter: Some(format!(
                "warn,sqlgate={level},sqlgate_core={level},sqlgate_db={level}"
            )),
            ..Self::default()
        }
    }

    /// Switch to JSON output
    pub fn json(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn filter_directive(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(&self.level)
    }
}

impl From<&MigrateConfig> for LoggingConfig {
    fn from(config: &MigrateConfig) -> Self {
        let logging = Self::for_level(&config.log_level);
        if config.json_logs() {
            logging.json()
        } else {
            logging
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directive()))?;

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr).json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stderr))
            .try_init()?;
    }

    tracing::debug!(
        target: "sqlgate::logging",
        "logging initialized (level: {}, format: {})",
        config.level,
        if config.json_format { "json" } else { "text" }
    );

    Ok(())
}
