use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::diff::{FieldChanges, diff_snapshots};
use crate::entities::Snapshot;
use crate::enums::RevisionType;
use crate::ids::{RecordId, RevisionNumber};

/// One reconstructed revision of a tracked record.
///
/// Built per history request and never persisted. `previous_snapshot` is the
/// snapshot of the next-older revision in the same history, or `None` for the
/// oldest one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EntityRevision {
    pub record_id: RecordId,
    pub revision_number: RevisionNumber,
    pub revision_type: RevisionType,
    pub timestamp: Option<DateTime<Utc>>,
    pub modified_by: Option<String>,
    pub snapshot: Snapshot,
    pub previous_snapshot: Option<Snapshot>,
}

impl EntityRevision {
    /// Field-level changes against the previous snapshot.
    #[must_use]
    pub fn changes(&self) -> FieldChanges {
        diff_snapshots(&self.snapshot, self.previous_snapshot.as_ref())
    }
}
