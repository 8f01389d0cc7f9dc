//! # sqlgate-core
//!
//! Process-wide pieces of the sqlgate migration runner: the run configuration
//! assembled once at startup, its validation errors, and tracing setup.

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigResult, ConfigSource, MigrateConfig};
pub use logging::{init_logging, LoggingConfig};
