//! Configuration schema (sqlbind.toml)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::ErrorCode;
use crate::mapping::SqlType;

/// Binding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Name unannotated parameters by their declared names when the metadata
    /// provides them, instead of by position ("0", "1", ...)
    #[serde(default = "default_use_actual_param_name")]
    pub use_actual_param_name: bool,

    /// Storage type used for null values bound without a declared type
    #[serde(default)]
    pub sql_type_for_null: SqlType,

    /// Treat null iteration sources as empty unless a statement says otherwise
    #[serde(default)]
    pub nullable_on_for_each: bool,

    /// Statement timeout applied when a statement declares none
    #[serde(default)]
    pub default_statement_timeout_secs: Option<u64>,
}

fn default_use_actual_param_name() -> bool {
    true
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            use_actual_param_name: default_use_actual_param_name(),
            sql_type_for_null: SqlType::Other,
            nullable_on_for_each: false,
            default_statement_timeout_secs: None,
        }
    }
}

impl BindingConfig {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Whether a null iteration source is allowed, given the statement's own setting
    pub fn foreach_nullable(&self, statement_setting: Option<bool>) -> bool {
        statement_setting.unwrap_or(self.nullable_on_for_each)
    }

    pub fn default_statement_timeout(&self) -> Option<Duration> {
        self.default_statement_timeout_secs.map(Duration::from_secs)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ConfigInvalid
    }
}
