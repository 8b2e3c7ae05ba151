//! Revision number aggregation across change logs.

use std::collections::BTreeSet;

use typo_core::ids::{RecordId, RevisionNumber};

use super::ChangeLogReader;
use crate::error::HistoryError;

impl ChangeLogReader<'_> {
    /// Check that the store can be read at all.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::StoreUnavailable` if the schema cannot be read.
    pub async fn check_readable(&self) -> Result<(), HistoryError> {
        let unavailable = |e: libsql::Error| HistoryError::StoreUnavailable(e.to_string());
        let mut rows = self
            .conn
            .query("SELECT count(*) FROM sqlite_master", ())
            .await
            .map_err(unavailable)?;
        rows.next().await.map_err(unavailable)?;
        Ok(())
    }

    /// Every revision number in which `record` or any of its tracked
    /// sub-records changed, newest first and without duplicates.
    ///
    /// Individual change logs that cannot be scanned count as empty.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::StoreUnavailable` if the store itself cannot be
    /// read.
    pub async fn aggregate(&self, record: RecordId) -> Result<Vec<RevisionNumber>, HistoryError> {
        self.check_readable().await?;

        let mut all = BTreeSet::new();
        for table in self.tables.iter() {
            all.extend(self.scan_table(table, record).await);
        }

        tracing::debug!(record = %record, revisions = all.len(), "aggregated revisions");
        Ok(all.into_iter().rev().collect())
    }
}
