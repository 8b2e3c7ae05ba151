//! Revision metadata: commit time, author and change type.
//!
//! The change type comes from the primary change log's marker when the
//! revision wrote a primary row. Otherwise it is inferred, and the result is
//! tagged [`RevisionType::Heuristic`] so callers can tell the two apart.

use chrono::{DateTime, Utc};
use typo_core::enums::{RevisionAction, RevisionType};
use typo_core::ids::{RecordId, RevisionNumber};

use super::ChangeLogReader;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_i64, get_opt_string, parse_epoch_millis, quote_ident};

/// Registry entry of one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionInfo {
    pub timestamp: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
}

impl ChangeLogReader<'_> {
    /// Registry entry for `revision`, `None` if the registry has no row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the registry cannot be read.
    pub async fn revision_info(
        &self,
        revision: RevisionNumber,
    ) -> Result<Option<RevisionInfo>, DatabaseError> {
        let sql = format!(
            "SELECT revtstmp, username FROM {} WHERE rev = ?1",
            quote_ident(&self.config.revision_table)
        );
        let mut rows = self.conn.query(&sql, libsql::params![revision.get()]).await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        let timestamp = get_opt_i64(&row, 0)?.map(parse_epoch_millis).transpose()?;
        Ok(Some(RevisionInfo {
            timestamp,
            modified_by: get_opt_string(&row, 1)?,
        }))
    }

    /// Commit time of `revision`, `None` if the registry has no entry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the registry cannot be read.
    pub async fn resolve_timestamp(
        &self,
        revision: RevisionNumber,
    ) -> Result<Option<DateTime<Utc>>, DatabaseError> {
        Ok(self
            .revision_info(revision)
            .await?
            .and_then(|info| info.timestamp))
    }

    /// Change-type marker of the primary row written at exactly `revision`.
    ///
    /// `None` when the revision wrote no primary row, the marker is NULL, or
    /// the marker is not one of the known values.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the primary change log cannot be read.
    pub async fn change_marker(
        &self,
        record: RecordId,
        revision: RevisionNumber,
    ) -> Result<Option<RevisionAction>, DatabaseError> {
        let Some(primary) = self.tables.primary() else {
            return Ok(None);
        };
        let sql = format!(
            "SELECT revtype FROM {} WHERE {} = ?1 AND rev = ?2 LIMIT 1",
            self.audit_table(primary),
            primary.id_column()
        );
        let mut rows = self
            .conn
            .query(&sql, libsql::params![record.get(), revision.get()])
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let Some(marker) = get_opt_i64(&row, 0)? else {
            return Ok(None);
        };

        match RevisionAction::from_marker(marker) {
            Ok(action) => Ok(Some(action)),
            Err(e) => {
                tracing::warn!(
                    record = %record,
                    revision = %revision,
                    error = %e,
                    "ignoring unknown change marker"
                );
                Ok(None)
            }
        }
    }

    /// Classify `revision` of `record`.
    ///
    /// `snapshot_found` says whether the primary record existed at the
    /// revision; `is_earliest` whether it is the oldest revision of the
    /// record's history.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the primary change log cannot be read.
    pub async fn resolve_revision_type(
        &self,
        record: RecordId,
        revision: RevisionNumber,
        snapshot_found: bool,
        is_earliest: bool,
    ) -> Result<RevisionType, DatabaseError> {
        let marker = self.change_marker(record, revision).await?;
        Ok(classify_revision(marker, snapshot_found, is_earliest))
    }
}

/// Pick a change type, first matching rule wins:
///
/// 1. an explicit marker is authoritative;
/// 2. the earliest revision with a primary record is a creation;
/// 3. a revision without a primary record is a modification;
/// 4. anything else is a modification.
///
/// Rules 2 to 4 are inferred. A record whose earliest change-log row is not
/// its creation (history truncated, or a sub-record written first) will be
/// labelled a creation by rule 2.
#[must_use]
pub const fn classify_revision(
    marker: Option<RevisionAction>,
    snapshot_found: bool,
    is_earliest: bool,
) -> RevisionType {
    match marker {
        Some(action) => RevisionType::Authoritative(action),
        None if is_earliest && snapshot_found => RevisionType::Heuristic(RevisionAction::Create),
        None => RevisionType::Heuristic(RevisionAction::Modify),
    }
}
