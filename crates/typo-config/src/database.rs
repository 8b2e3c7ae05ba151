//! Change-log store configuration.

use serde::{Deserialize, Serialize};

/// History reads never write, so the reader connection is query-only by default.
const fn default_read_only() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file holding the change logs.
    #[serde(default)]
    pub path: String,

    /// Open the history reader with `PRAGMA query_only = ON`.
    #[serde(default = "default_read_only")]
    pub read_only: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            read_only: default_read_only(),
        }
    }
}

impl DatabaseConfig {
    /// Check if a database path has been provided.
    pub fn is_configured(&self) -> bool {
        !self.path.is_empty()
    }
}
