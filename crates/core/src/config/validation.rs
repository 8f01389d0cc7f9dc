use thiserror::Error;

/// Result alias for configuration loading and validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {field}. {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("Invalid value for '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    /// Create a missing required field error
    pub fn missing_required(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Name of the setting this error is about
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequired { field, .. } | Self::InvalidValue { field, .. } => field,
        }
    }
}

/// Parse a boolean environment value
pub fn parse_flag(field: &str, raw: &str) -> ConfigResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid_value(
            field,
            raw,
            "one of: true, false, 1, 0, yes, no, on, off",
        )),
    }
}
