use serde::Serialize;

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ConfigSource {
    /// Value loaded from environment variable (including `.env` files)
    EnvVar(String),
    /// Value given as a command line flag
    CommandLine(String),
    /// Default value used
    Default,
}

impl ConfigSource {
    /// Check if source is default value
    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default)
    }

    /// Get source description
    pub fn description(&self) -> String {
        match self {
            ConfigSource::EnvVar(var) => format!("environment variable {}", var),
            ConfigSource::CommandLine(flag) => format!("command line flag --{}", flag),
            ConfigSource::Default => "default".to_string(),
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
