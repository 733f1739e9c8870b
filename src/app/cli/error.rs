//! Errors raised while resolving configuration

use crate::core::error_handling::ContextualError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { .. } => Some("Check the --config-file path"),
            ConfigError::Read { .. } => None,
            ConfigError::Parse { .. } => Some("Fix the TOML syntax in the configuration file"),
            ConfigError::InvalidValue { message, .. } => Some(message),
            ConfigError::UnknownKey { .. } => Some(
                "Known keys: capacity, policy, output-dir, endpoint-name, log-level, log-format, log-file",
            ),
        }
    }
}
