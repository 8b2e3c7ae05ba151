//! Revision history reconstruction.
//!
//! Reconstruction runs in stages over one query-only connection:
//!
//! 1. [`scanner`]: revision numbers present in one change log for a record.
//! 2. [`aggregator`]: the union over every tracked change log, newest first.
//! 3. [`materializer`]: the record's snapshot at one revision.
//! 4. [`metadata`]: commit timestamp, author and change type of a revision.
//!
//! [`crate::service::HistoryService`] composes the stages and pairs each
//! revision with its predecessor. The diff itself is pure and lives in
//! `typo_core::diff`; [`request_diff`] is the entry point for callers holding
//! an [`EntityRevision`].

pub mod aggregator;
pub mod materializer;
pub mod metadata;
pub mod scanner;

use typo_config::HistoryConfig;
use typo_core::diff::FieldChanges;
use typo_core::entities::EntityRevision;

use crate::tables::{ChangeLogTable, TableSet};

pub use materializer::Materialized;
pub use metadata::{RevisionInfo, classify_revision};

/// Read access to the change logs of one store for one request.
pub struct ChangeLogReader<'a> {
    conn: libsql::Connection,
    tables: &'a TableSet,
    config: &'a HistoryConfig,
}

impl<'a> ChangeLogReader<'a> {
    #[must_use]
    pub const fn new(
        conn: libsql::Connection,
        tables: &'a TableSet,
        config: &'a HistoryConfig,
    ) -> Self {
        Self {
            conn,
            tables,
            config,
        }
    }

    #[must_use]
    pub const fn tables(&self) -> &TableSet {
        self.tables
    }

    fn audit_table(&self, table: &ChangeLogTable) -> String {
        table.audit_table(&self.config.audit_suffix)
    }
}

/// Field changes introduced by `revision` relative to its predecessor.
///
/// The oldest revision of a record has no predecessor, so every field it
/// carries is reported as newly set.
#[must_use]
pub fn request_diff(revision: &EntityRevision) -> FieldChanges {
    revision.changes()
}
