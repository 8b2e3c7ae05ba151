//! Snapshot materialization.
//!
//! Every source is read as of the revision. For the primary record that is
//! the latest change-log row at or before it, unless that row is a deletion.
//! Related tables are versioned per sub-record: each label, description or
//! reference row keeps the state of its latest change at or before the
//! revision, and drops out once that latest change is a deletion. A revision
//! that did not touch a related table therefore still carries its fields.
//!
//! Every related table is loaded independently. A failure there drops only
//! that table's fields from the snapshot.

use std::collections::BTreeMap;

use typo_core::entities::{FieldValue, Snapshot};
use typo_core::enums::RevisionAction;
use typo_core::ids::{RecordId, RevisionNumber};

use super::ChangeLogReader;
use crate::error::DatabaseError;
use crate::helpers::{get_i64, get_opt_i64, get_opt_string, quote_ident, value_to_field};
use crate::tables::{ChangeLogTable, TableRole, UNKNOWN_LANGUAGE};

/// Separator between several reference values filed under one code.
pub const REFERENCE_SEPARATOR: &str = "; ";

/// Non-versioned lookup table for entity type codes.
const ENTITY_TYPE_TABLE: &str = "entity_type";

/// Marker of a deletion row, excluded from related-table reads.
const DELETE_MARKER: i64 = RevisionAction::Delete.marker();

/// Snapshot of one record at one revision plus how it was assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Materialized {
    pub snapshot: Snapshot,
    /// Whether the primary record existed at this revision.
    pub primary_found: bool,
    /// Tables or lookups whose fields were dropped after a read failure.
    pub omitted: Vec<String>,
}

/// Primary record state read from its change log.
struct PrimaryRow {
    id: i64,
    code: Option<String>,
    name: Option<String>,
    entity_type_id: Option<i64>,
    status: Option<String>,
    is_public: Option<i64>,
    created_at: Option<String>,
    created_by: Option<String>,
}

impl PrimaryRow {
    fn from_row(row: &libsql::Row) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: get_i64(row, 1)?,
            code: get_opt_string(row, 2)?,
            name: get_opt_string(row, 3)?,
            entity_type_id: get_opt_i64(row, 4)?,
            status: get_opt_string(row, 5)?,
            is_public: get_opt_i64(row, 6)?,
            created_at: get_opt_string(row, 7)?,
            created_by: get_opt_string(row, 8)?,
        })
    }
}

impl ChangeLogReader<'_> {
    /// Reconstruct the snapshot of `record` at `revision`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` only when the primary record cannot be read.
    /// Related-table failures are logged and recorded in
    /// [`Materialized::omitted`].
    pub async fn materialize(
        &self,
        record: RecordId,
        revision: RevisionNumber,
    ) -> Result<Materialized, DatabaseError> {
        let mut materialized = Materialized::default();

        if let Some(primary) = self.tables.primary() {
            if let Some(state) = self.load_primary(primary, record, revision).await? {
                materialized.primary_found = true;
                self.insert_primary(state, &mut materialized).await;
            }
        }

        for table in self.tables.related() {
            let loaded = match table.role {
                TableRole::Localized {
                    field,
                    language_column,
                    text_column,
                } => self
                    .load_keyed_text(table, record, revision, language_column, text_column, true)
                    .await
                    .map(|map| vec![(field.to_string(), FieldValue::Map(map))]),
                TableRole::Keyed {
                    field,
                    key_column,
                    value_column,
                } => self
                    .load_keyed_text(table, record, revision, key_column, value_column, false)
                    .await
                    .map(|map| vec![(field.to_string(), FieldValue::Map(map))]),
                TableRole::Attributes { columns } => {
                    self.load_attributes(table, record, revision, columns).await
                }
                TableRole::Primary | TableRole::ScanOnly => continue,
            };

            match loaded {
                Ok(fields) => {
                    for (field, value) in fields {
                        match value {
                            FieldValue::Map(map) => materialized.snapshot.insert_map(field, map),
                            other => materialized.snapshot.insert(field, other),
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        table = %table.name,
                        record = %record,
                        revision = %revision,
                        error = %e,
                        "failed to load related table; omitting its fields"
                    );
                    materialized.omitted.push(table.name.clone());
                }
            }
        }

        Ok(materialized)
    }

    /// Latest primary row at or before `revision`, `None` if absent or deleted.
    async fn load_primary(
        &self,
        table: &ChangeLogTable,
        record: RecordId,
        revision: RevisionNumber,
    ) -> Result<Option<PrimaryRow>, DatabaseError> {
        let sql = format!(
            "SELECT revtype, {id}, code, name, entity_type_id, status, is_public, created_at, created_by
             FROM {table} WHERE {id} = ?1 AND rev <= ?2
             ORDER BY rev DESC LIMIT 1",
            id = table.id_column(),
            table = self.audit_table(table),
        );
        let mut rows = self
            .conn
            .query(&sql, libsql::params![record.get(), revision.get()])
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        if get_opt_i64(&row, 0)? == Some(DELETE_MARKER) {
            return Ok(None);
        }
        Ok(Some(PrimaryRow::from_row(&row)?))
    }

    async fn insert_primary(&self, state: PrimaryRow, materialized: &mut Materialized) {
        let snapshot = &mut materialized.snapshot;
        snapshot.insert("id", state.id);
        if let Some(code) = state.code {
            snapshot.insert("code", code);
        }
        if let Some(name) = state.name {
            snapshot.insert("name", name);
        }
        if let Some(status) = state.status {
            snapshot.insert("status", status);
        }
        if let Some(is_public) = state.is_public {
            snapshot.insert("is_public", is_public != 0);
        }
        if let Some(created_at) = state.created_at {
            snapshot.insert("created_at", created_at);
        }
        if let Some(created_by) = state.created_by {
            snapshot.insert("created_by", created_by);
        }

        if let Some(type_id) = state.entity_type_id {
            match self.entity_type_code(type_id).await {
                Ok(Some(code)) => materialized.snapshot.insert("entity_type_code", code),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        entity_type_id = type_id,
                        error = %e,
                        "failed to resolve entity type; omitting entity_type_code"
                    );
                    materialized.omitted.push(ENTITY_TYPE_TABLE.to_string());
                }
            }
        }
    }

    async fn entity_type_code(&self, type_id: i64) -> Result<Option<String>, DatabaseError> {
        let sql = format!(
            "SELECT code FROM {} WHERE id = ?1",
            quote_ident(ENTITY_TYPE_TABLE)
        );
        let mut rows = self.conn.query(&sql, libsql::params![type_id]).await?;
        match rows.next().await? {
            Some(row) => get_opt_string(&row, 0),
            None => Ok(None),
        }
    }

    /// Rows of `table` owned by `record` whose sub-record is live at `revision`.
    ///
    /// A sub-record is live when its latest change-log row at or before the
    /// revision belongs to `record` and is not a deletion. The latest row is
    /// looked up without the owner filter, so a deletion row that no longer
    /// carries the owner id still retires the sub-record.
    fn live_rows_sql(&self, table: &ChangeLogTable, select: &str, order: &str) -> String {
        let audit = self.audit_table(table);
        format!(
            "SELECT {select} FROM {audit} AS a
             WHERE a.{owner} = ?1 AND a.rev <= ?2
               AND a.rev = (SELECT MAX(b.rev) FROM {audit} AS b WHERE b.id = a.id AND b.rev <= ?2)
               AND (a.revtype IS NULL OR a.revtype != ?3)
             ORDER BY {order}",
            owner = table.id_column(),
        )
    }

    /// Fold the live `(key, text)` rows at `revision` into a map.
    ///
    /// Localized rows without a language code land under
    /// [`UNKNOWN_LANGUAGE`] and a later row for the same language wins.
    /// Keyed rows without a key are skipped, and several values under one key
    /// are joined with [`REFERENCE_SEPARATOR`] in sub-record order.
    async fn load_keyed_text(
        &self,
        table: &ChangeLogTable,
        record: RecordId,
        revision: RevisionNumber,
        key_column: &str,
        text_column: &str,
        localized: bool,
    ) -> Result<BTreeMap<String, String>, DatabaseError> {
        let select = format!("a.{}, a.{}", quote_ident(key_column), quote_ident(text_column));
        let sql = self.live_rows_sql(table, &select, "a.id");
        let mut rows = self
            .conn
            .query(
                &sql,
                libsql::params![record.get(), revision.get(), DELETE_MARKER],
            )
            .await?;

        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        while let Some(row) = rows.next().await? {
            let key = match get_opt_string(&row, 0)? {
                Some(key) => key,
                None if localized => UNKNOWN_LANGUAGE.to_string(),
                None => continue,
            };
            let Some(text) = get_opt_string(&row, 1)? else {
                continue;
            };
            grouped.entry(key).or_default().push(text);
        }

        Ok(grouped
            .into_iter()
            .filter_map(|(key, mut texts)| {
                let text = if localized {
                    texts.pop()?
                } else {
                    texts.join(REFERENCE_SEPARATOR)
                };
                Some((key, text))
            })
            .collect())
    }

    /// Read the most recently changed live attribute row at `revision`.
    async fn load_attributes(
        &self,
        table: &ChangeLogTable,
        record: RecordId,
        revision: RevisionNumber,
        columns: &[(&str, &str)],
    ) -> Result<Vec<(String, FieldValue)>, DatabaseError> {
        let select = columns
            .iter()
            .map(|(column, _)| format!("a.{}", quote_ident(column)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = self.live_rows_sql(table, &select, "a.rev DESC, a.id DESC LIMIT 1");
        let mut rows = self
            .conn
            .query(
                &sql,
                libsql::params![record.get(), revision.get(), DELETE_MARKER],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(Vec::new());
        };

        let mut fields = Vec::new();
        for (idx, (_, field)) in (0_i32..).zip(columns) {
            if let Some(value) = value_to_field(row.get_value(idx)?)? {
                fields.push(((*field).to_string(), value));
            }
        }
        Ok(fields)
    }
}
