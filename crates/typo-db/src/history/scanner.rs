//! Change-log scanning.
//!
//! A scan answers one question: in which revisions does this change log hold
//! a row for this record? A table that is missing or unreadable is treated as
//! having no revisions, so one broken change log never hides the others.

use std::collections::BTreeSet;

use typo_core::ids::{RecordId, RevisionNumber};

use super::ChangeLogReader;
use crate::error::DatabaseError;
use crate::helpers::get_opt_i64;
use crate::tables::ChangeLogTable;

impl ChangeLogReader<'_> {
    /// Distinct revision numbers in which `table` has a row for `record`.
    ///
    /// Never fails. Query errors are logged and yield an empty set.
    pub async fn scan_table(
        &self,
        table: &ChangeLogTable,
        record: RecordId,
    ) -> BTreeSet<RevisionNumber> {
        match self.try_scan_table(table, record).await {
            Ok(revisions) => revisions,
            Err(e) => {
                tracing::debug!(
                    table = %table.name,
                    record = %record,
                    error = %e,
                    "change log scan failed; treating as empty"
                );
                BTreeSet::new()
            }
        }
    }

    async fn try_scan_table(
        &self,
        table: &ChangeLogTable,
        record: RecordId,
    ) -> Result<BTreeSet<RevisionNumber>, DatabaseError> {
        let sql = format!(
            "SELECT DISTINCT rev FROM {} WHERE {} = ?1",
            self.audit_table(table),
            table.id_column()
        );
        let mut rows = self.conn.query(&sql, libsql::params![record.get()]).await?;

        let mut revisions = BTreeSet::new();
        while let Some(row) = rows.next().await? {
            // Rows without a revision reference contribute nothing.
            if let Some(rev) = get_opt_i64(&row, 0)? {
                revisions.insert(RevisionNumber(rev));
            }
        }
        Ok(revisions)
    }
}
