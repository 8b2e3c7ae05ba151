//! Change-log table descriptors.
//!
//! The engine never hard-codes a query per table. Each change log it reads is
//! described here once: its logical name, the column holding the owning
//! record's id, and how its rows contribute to a snapshot. Revision scanning
//! walks every descriptor; materialization walks those with a snapshot role.

use typo_config::HistoryConfig;

use crate::helpers::quote_ident;

/// How rows of a change log contribute to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    /// The record itself. Scalar fields, read as of the revision.
    Primary,
    /// Per-language text rows folded into one map field.
    Localized {
        field: &'static str,
        language_column: &'static str,
        text_column: &'static str,
    },
    /// One row per record holding named attributes; `(column, field)` pairs.
    Attributes {
        columns: &'static [(&'static str, &'static str)],
    },
    /// Keyed reference rows folded into one map field.
    Keyed {
        field: &'static str,
        key_column: &'static str,
        value_column: &'static str,
    },
    /// Only contributes revision numbers.
    ScanOnly,
}

/// One change log the engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogTable {
    /// Logical table name, without the audit suffix.
    pub name: String,
    /// Column holding the owning record's id.
    pub id_column: String,
    pub role: TableRole,
}

impl ChangeLogTable {
    fn builtin(name: &str, id_column: &str, role: TableRole) -> Self {
        Self {
            name: name.to_string(),
            id_column: id_column.to_string(),
            role,
        }
    }

    /// Quoted physical name of the change log, e.g. `"label_aud"`.
    #[must_use]
    pub fn audit_table(&self, suffix: &str) -> String {
        quote_ident(&format!("{}{suffix}", self.name))
    }

    /// Quoted id column.
    #[must_use]
    pub fn id_column(&self) -> String {
        quote_ident(&self.id_column)
    }
}

/// Field name of the multilingual label map.
pub const LABELS_FIELD: &str = "labels";
/// Field name of the multilingual description map.
pub const DESCRIPTIONS_FIELD: &str = "descriptions";
/// Field name of the external reference map.
pub const REFERENCES_FIELD: &str = "references";

/// Language key used when a localized row has no language code.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

const DESCRIPTION_DETAIL_COLUMNS: &[(&str, &str)] = &[
    ("decors", "decors"),
    ("marks", "marks"),
    ("function_usage", "function_usage"),
];

const PHYSICAL_CHARACTERISTIC_COLUMNS: &[(&str, &str)] = &[
    ("materials", "materials"),
    ("metrology", "metrology"),
    ("manufacturing", "manufacturing"),
];

const PASTE_DESCRIPTION_COLUMNS: &[(&str, &str)] = &[
    ("description", "paste_description"),
    ("color", "paste_color"),
    ("nature", "paste_nature"),
    ("inclusions", "inclusions"),
    ("firing", "firing"),
];

const ENTITY_METADATA_COLUMNS: &[(&str, &str)] = &[
    ("comment", "comment"),
    ("bibliography", "bibliography"),
    ("appellation", "appellation"),
    ("reference", "reference"),
    ("scientific_typology", "scientific_typology"),
    ("persistent_identifier", "persistent_identifier"),
    ("previous_version", "previous_version"),
    ("tpq", "tpq"),
    ("taq", "taq"),
    ("workshops", "workshops"),
    ("attestations", "attestations"),
    ("archaeological_sites", "archaeological_sites"),
];

/// The set of change logs consulted for one store.
#[derive(Debug, Clone)]
pub struct TableSet {
    tables: Vec<ChangeLogTable>,
}

impl TableSet {
    /// Built-in thesaurus tables plus any configured scan-only tables.
    #[must_use]
    pub fn from_config(config: &HistoryConfig) -> Self {
        let mut tables = Self::builtin_tables();
        for extra in &config.extra_tables {
            if tables.iter().any(|t| t.name == extra.table) {
                tracing::debug!(table = %extra.table, "extra table already tracked; skipping");
                continue;
            }
            tables.push(ChangeLogTable {
                name: extra.table.clone(),
                id_column: extra.id_column.clone(),
                role: TableRole::ScanOnly,
            });
        }
        Self { tables }
    }

    fn builtin_tables() -> Vec<ChangeLogTable> {
        vec![
            ChangeLogTable::builtin("entity", "id", TableRole::Primary),
            ChangeLogTable::builtin(
                "description",
                "entity_id",
                TableRole::Localized {
                    field: DESCRIPTIONS_FIELD,
                    language_column: "language_code",
                    text_column: "value",
                },
            ),
            ChangeLogTable::builtin(
                "label",
                "entity_id",
                TableRole::Localized {
                    field: LABELS_FIELD,
                    language_column: "language_code",
                    text_column: "name",
                },
            ),
            ChangeLogTable::builtin(
                "description_detail",
                "entity_id",
                TableRole::Attributes {
                    columns: DESCRIPTION_DETAIL_COLUMNS,
                },
            ),
            ChangeLogTable::builtin(
                "physical_characteristic",
                "entity_id",
                TableRole::Attributes {
                    columns: PHYSICAL_CHARACTERISTIC_COLUMNS,
                },
            ),
            ChangeLogTable::builtin(
                "paste_description",
                "entity_id",
                TableRole::Attributes {
                    columns: PASTE_DESCRIPTION_COLUMNS,
                },
            ),
            ChangeLogTable::builtin(
                "reference_opentheso",
                "entity_id",
                TableRole::Keyed {
                    field: REFERENCES_FIELD,
                    key_column: "code",
                    value_column: "value",
                },
            ),
            ChangeLogTable::builtin(
                "entity_metadata",
                "entity_id",
                TableRole::Attributes {
                    columns: ENTITY_METADATA_COLUMNS,
                },
            ),
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeLogTable> {
        self.tables.iter()
    }

    /// The primary entity change log.
    #[must_use]
    pub fn primary(&self) -> Option<&ChangeLogTable> {
        self.tables.iter().find(|t| t.role == TableRole::Primary)
    }

    /// Tables that contribute fields beyond the primary record.
    pub fn related(&self) -> impl Iterator<Item = &ChangeLogTable> {
        self.tables
            .iter()
            .filter(|t| !matches!(t.role, TableRole::Primary | TableRole::ScanOnly))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
