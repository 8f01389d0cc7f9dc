//! Migration files: discovery from disk and per-file application.

pub mod definitions;
pub mod executor;
pub mod loader;

pub use definitions::MigrationFile;
pub use executor::MigrationExecutor;
pub use loader::MigrationLoader;
