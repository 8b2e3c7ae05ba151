//! Errors raised while loading typo configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration layer (TOML file, environment) failed to parse or merge.
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// A history table or column name is not usable as a SQL identifier.
    #[error("invalid identifier in '{field}': {reason}")]
    InvalidIdentifier { field: String, reason: String },
}
