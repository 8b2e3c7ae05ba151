//! Revision history engine configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_audit_suffix() -> String {
    "_aud".to_string()
}

fn default_revision_table() -> String {
    "revinfo".to_string()
}

/// An additional change log to scan for a record's revisions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtraTable {
    /// Logical table name, without the audit suffix.
    pub table: String,
    /// Column linking the change-log row to the tracked record.
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

fn default_id_column() -> String {
    "entity_id".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryConfig {
    /// Suffix appended to a logical table name to get its change log.
    #[serde(default = "default_audit_suffix")]
    pub audit_suffix: String,

    /// Revision registry table (revision number → timestamp).
    #[serde(default = "default_revision_table")]
    pub revision_table: String,

    /// Change logs scanned in addition to the built-in ones.
    #[serde(default)]
    pub extra_tables: Vec<ExtraTable>,

    /// Keep only the newest N revisions. `0` keeps all of them.
    #[serde(default)]
    pub max_revisions: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            audit_suffix: default_audit_suffix(),
            revision_table: default_revision_table(),
            extra_tables: Vec::new(),
            max_revisions: 0,
        }
    }
}

impl HistoryConfig {
    /// Reject identifiers that cannot be safely quoted into SQL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidIdentifier` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_identifier("history.audit_suffix", &self.audit_suffix, true)?;
        check_identifier("history.revision_table", &self.revision_table, false)?;
        for (i, extra) in self.extra_tables.iter().enumerate() {
            check_identifier(&format!("history.extra_tables[{i}].table"), &extra.table, false)?;
            check_identifier(
                &format!("history.extra_tables[{i}].id_column"),
                &extra.id_column,
                false,
            )?;
        }
        Ok(())
    }

    /// Optional revision cap, `None` when unlimited.
    pub const fn revision_limit(&self) -> Option<usize> {
        if self.max_revisions == 0 {
            None
        } else {
            Some(self.max_revisions)
        }
    }
}

fn check_identifier(field: &str, value: &str, allow_empty: bool) -> Result<(), ConfigError> {
    if value.is_empty() && !allow_empty {
        return Err(ConfigError::InvalidIdentifier {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(ConfigError::InvalidIdentifier {
            field: field.to_string(),
            reason: format!("unexpected character '{bad}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = HistoryConfig::default();
        assert_eq!(config.audit_suffix, "_aud");
        assert_eq!(config.revision_table, "revinfo");
        assert!(config.extra_tables.is_empty());
        assert_eq!(config.revision_limit(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn revision_limit_when_capped() {
        let config = HistoryConfig {
            max_revisions: 25,
            ..Default::default()
        };
        assert_eq!(config.revision_limit(), Some(25));
    }

    #[test]
    fn rejects_quote_in_table_name() {
        let config = HistoryConfig {
            extra_tables: vec![ExtraTable {
                table: "image\"; DROP".into(),
                id_column: "entity_id".into(),
            }],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidIdentifier { ref field, .. } if field == "history.extra_tables[0].table"
        ));
    }

    #[test]
    fn rejects_empty_revision_table() {
        let config = HistoryConfig {
            revision_table: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
