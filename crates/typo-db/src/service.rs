//! Service layer composing the history stages.
//!
//! `HistoryService` owns a [`TypoDb`] handle and the table descriptors. Each
//! request opens its own reader connection, walks the stages strictly in
//! sequence and returns fully assembled [`EntityRevision`] values.
//!
//! Fault handling:
//! - a change log that cannot be scanned counts as empty;
//! - a related table that cannot be loaded drops only its fields;
//! - a revision whose primary record or registry entry cannot be read is
//!   dropped from the history;
//! - a store that cannot be read at all surfaces as
//!   [`HistoryError::StoreUnavailable`] from the `try_` methods and as an
//!   empty history from the others.

use typo_config::{HistoryConfig, TypoConfig};
use typo_core::entities::EntityRevision;
use typo_core::ids::{RecordId, RevisionNumber};

use crate::TypoDb;
use crate::error::{DatabaseError, HistoryError};
use crate::history::ChangeLogReader;
use crate::tables::TableSet;

/// Reconstructs revision histories from a change-log store.
pub struct HistoryService {
    db: TypoDb,
    tables: TableSet,
    config: HistoryConfig,
    query_only: bool,
}

impl HistoryService {
    /// Open the store named by `config.database.path` without modifying it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if no path is configured or the database
    /// cannot be opened.
    pub async fn open(config: &TypoConfig) -> Result<Self, DatabaseError> {
        if !config.database.is_configured() {
            return Err(DatabaseError::InvalidState(
                "database.path is not configured".into(),
            ));
        }
        let db = TypoDb::open_existing(&config.database.path).await?;
        let mut service = Self::new(db, config.history.clone());
        service.query_only = config.database.read_only;
        Ok(service)
    }

    /// Wrap an already opened database. Readers are query-only.
    #[must_use]
    pub fn new(db: TypoDb, config: HistoryConfig) -> Self {
        Self {
            tables: TableSet::from_config(&config),
            db,
            config,
            query_only: true,
        }
    }

    #[must_use]
    pub const fn db(&self) -> &TypoDb {
        &self.db
    }

    #[must_use]
    pub const fn tables(&self) -> &TableSet {
        &self.tables
    }

    async fn reader(&self) -> Result<ChangeLogReader<'_>, HistoryError> {
        let conn = self
            .db
            .reader(self.query_only)
            .await
            .map_err(|e| HistoryError::StoreUnavailable(e.to_string()))?;
        Ok(ChangeLogReader::new(conn, &self.tables, &self.config))
    }

    /// Full revision history of `record`, newest first.
    ///
    /// Never fails: an unreadable store is logged and yields an empty list.
    pub async fn request_history(&self, record: RecordId) -> Vec<EntityRevision> {
        match self.try_request_history(record).await {
            Ok(history) => history,
            Err(e) => {
                tracing::error!(record = %record, error = %e, "history reconstruction failed");
                Vec::new()
            }
        }
    }

    /// Full revision history of `record`, newest first.
    ///
    /// Each revision carries the snapshot of the next-older surviving
    /// revision as its predecessor; the oldest carries none. With
    /// `history.max_revisions` set, only the newest revisions are kept, but
    /// the oldest kept one is still paired with its real predecessor.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::StoreUnavailable` if the store cannot be read.
    pub async fn try_request_history(
        &self,
        record: RecordId,
    ) -> Result<Vec<EntityRevision>, HistoryError> {
        let reader = self.reader().await?;
        let revisions = reader.aggregate(record).await?;
        let Some(&earliest) = revisions.last() else {
            tracing::debug!(record = %record, "no change-log rows; empty history");
            return Ok(Vec::new());
        };

        let keep = self
            .config
            .revision_limit()
            .map_or(revisions.len(), |limit| limit.min(revisions.len()));

        // One revision past the cap is assembled so the oldest kept entry has
        // its predecessor. Dropped revisions do not count towards either.
        let mut history = Vec::with_capacity((keep + 1).min(revisions.len()));
        for &revision in &revisions {
            if history.len() > keep {
                break;
            }
            if let Some(built) =
                build_or_skip(&reader, record, revision, revision == earliest).await
            {
                history.push(built);
            }
        }

        link_predecessors(&mut history);
        history.truncate(keep);
        tracing::info!(
            record = %record,
            found = revisions.len(),
            returned = history.len(),
            "reconstructed history"
        );
        Ok(history)
    }

    /// One revision of `record`, paired with its predecessor.
    ///
    /// Returns `None` if the revision is not part of the record's history,
    /// cannot be assembled, or the store is unreadable.
    pub async fn get_revision(
        &self,
        record: RecordId,
        revision: RevisionNumber,
    ) -> Option<EntityRevision> {
        match self.try_get_revision(record, revision).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!(
                    record = %record,
                    revision = %revision,
                    error = %e,
                    "revision lookup failed"
                );
                None
            }
        }
    }

    /// One revision of `record`, paired with its predecessor.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::StoreUnavailable` if the store cannot be read.
    pub async fn try_get_revision(
        &self,
        record: RecordId,
        revision: RevisionNumber,
    ) -> Result<Option<EntityRevision>, HistoryError> {
        let reader = self.reader().await?;
        let revisions = reader.aggregate(record).await?;
        let Some(position) = revisions.iter().position(|&r| r == revision) else {
            return Ok(None);
        };
        let earliest = revisions.last().copied();

        let Some(mut found) =
            build_or_skip(&reader, record, revision, Some(revision) == earliest).await
        else {
            return Ok(None);
        };

        for &older in &revisions[position + 1..] {
            if let Some(previous) =
                build_or_skip(&reader, record, older, Some(older) == earliest).await
            {
                found.previous_snapshot = Some(previous.snapshot);
                break;
            }
        }
        Ok(Some(found))
    }
}

/// Assemble one revision, or log and drop it on a per-revision fault.
async fn build_or_skip(
    reader: &ChangeLogReader<'_>,
    record: RecordId,
    revision: RevisionNumber,
    is_earliest: bool,
) -> Option<EntityRevision> {
    match build_revision(reader, record, revision, is_earliest).await {
        Ok(built) => Some(built),
        Err(e) => {
            tracing::warn!(
                record = %record,
                revision = %revision,
                error = %e,
                "dropping revision that could not be assembled"
            );
            None
        }
    }
}

async fn build_revision(
    reader: &ChangeLogReader<'_>,
    record: RecordId,
    revision: RevisionNumber,
    is_earliest: bool,
) -> Result<EntityRevision, DatabaseError> {
    let materialized = reader.materialize(record, revision).await?;
    let info = reader.revision_info(revision).await?.unwrap_or_default();
    let revision_type = reader
        .resolve_revision_type(record, revision, materialized.primary_found, is_earliest)
        .await?;

    Ok(EntityRevision {
        record_id: record,
        revision_number: revision,
        revision_type,
        timestamp: info.timestamp,
        modified_by: info.modified_by,
        snapshot: materialized.snapshot,
        previous_snapshot: None,
    })
}

/// Give every revision the snapshot of the next-older one in the list.
fn link_predecessors(history: &mut [EntityRevision]) {
    for i in 1..history.len() {
        let previous = history[i].snapshot.clone();
        history[i - 1].previous_snapshot = Some(previous);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use typo_core::entities::FieldValue;
    use typo_core::enums::{RevisionAction, RevisionType};

    use super::*;
    use crate::test_support::ChangeLogFixture;

    #[tokio::test]
    async fn history_links_each_revision_to_next_older() {
        let fixture = ChangeLogFixture::new().await;
        fixture.entity(7, 1, Some(0), "AMP-01").await;
        fixture.entity(7, 2, Some(1), "AMP-02").await;
        fixture.entity(7, 4, Some(1), "AMP-04").await;

        let history = fixture.service().await.request_history(RecordId(7)).await;

        let numbers: Vec<i64> = history.iter().map(|r| r.revision_number.get()).collect();
        assert_eq!(numbers, [4, 2, 1]);
        assert_eq!(history[0].previous_snapshot.as_ref(), Some(&history[1].snapshot));
        assert_eq!(history[1].previous_snapshot.as_ref(), Some(&history[2].snapshot));
        assert_eq!(history[2].previous_snapshot, None);
    }

    #[tokio::test]
    async fn max_revisions_keeps_newest_with_real_predecessor() {
        let fixture = ChangeLogFixture::new().await;
        fixture.entity(7, 1, Some(0), "AMP-01").await;
        fixture.entity(7, 2, Some(1), "AMP-02").await;
        fixture.entity(7, 3, Some(1), "AMP-03").await;
        let config = HistoryConfig {
            max_revisions: 2,
            ..HistoryConfig::default()
        };

        let service = fixture.service_with(config).await;
        let history = service.request_history(RecordId(7)).await;

        assert_eq!(history.len(), 2);
        assert_eq!(history[1].revision_number, RevisionNumber(2));
        assert_eq!(
            history[1]
                .previous_snapshot
                .as_ref()
                .and_then(|s| s.get("code")),
            Some(&FieldValue::from("AMP-01"))
        );
    }

    #[tokio::test]
    async fn max_revisions_skips_dropped_revisions_when_pairing() {
        let fixture = ChangeLogFixture::new().await;
        fixture.entity(7, 1, Some(0), "AMP-01").await;
        fixture.entity(7, 2, Some(1), "AMP-02").await;
        fixture
            .exec("INSERT INTO entity_aud (id, rev, revtype, code) VALUES (7, 3, 1, X'00FF')")
            .await;
        fixture.entity(7, 4, Some(1), "AMP-04").await;
        let config = HistoryConfig {
            max_revisions: 2,
            ..HistoryConfig::default()
        };

        let history = fixture.service_with(config).await.request_history(RecordId(7)).await;

        let numbers: Vec<i64> = history.iter().map(|r| r.revision_number.get()).collect();
        assert_eq!(numbers, [4, 2]);
        assert_eq!(
            history[1]
                .previous_snapshot
                .as_ref()
                .and_then(|s| s.get("code")),
            Some(&FieldValue::from("AMP-01"))
        );
    }

    #[tokio::test]
    async fn get_revision_pairs_predecessor() {
        let fixture = ChangeLogFixture::new().await;
        fixture.entity(7, 1, Some(0), "AMP-01").await;
        fixture.label(1, 3, 7, Some("fr"), "Amphore").await;

        let service = fixture.service().await;
        let found = service
            .get_revision(RecordId(7), RevisionNumber(3))
            .await
            .unwrap();

        assert_eq!(
            found.revision_type,
            RevisionType::Heuristic(RevisionAction::Modify)
        );
        assert_eq!(
            found
                .previous_snapshot
                .as_ref()
                .and_then(|s| s.get("code")),
            Some(&FieldValue::from("AMP-01"))
        );
        assert_eq!(service.get_revision(RecordId(7), RevisionNumber(2)).await, None);
    }

    #[tokio::test]
    async fn unknown_record_has_empty_history() {
        let fixture = ChangeLogFixture::new().await;
        let service = fixture.service().await;
        assert!(service.try_request_history(RecordId(99)).await.unwrap().is_empty());
    }
}
