pub mod migrate_config;
pub mod sources;
pub mod validation;

pub use migrate_config::*;
pub use sources::*;
pub use validation::*;
