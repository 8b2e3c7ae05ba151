//! CLI response types returned as JSON by `typo` commands.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::diff::FieldChanges;
use crate::entities::{EntityRevision, FieldValue};
use crate::enums::RevisionType;
use crate::ids::{RecordId, RevisionNumber};
use crate::labels::{field_label, format_value};

/// Response from `typo history`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HistoryResponse {
    pub record_id: RecordId,
    pub revision_count: usize,
    pub revisions: Vec<EntityRevision>,
}

impl HistoryResponse {
    #[must_use]
    pub fn new(record_id: RecordId, revisions: Vec<EntityRevision>) -> Self {
        Self {
            record_id,
            revision_count: revisions.len(),
            revisions,
        }
    }
}

/// One field change with its display label and rendered values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LabeledChange {
    pub key: String,
    pub label: String,
    pub old: Option<FieldValue>,
    pub new: Option<FieldValue>,
    pub old_display: String,
    pub new_display: String,
}

/// Response from `typo diff`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RevisionDiffResponse {
    pub record_id: RecordId,
    pub revision_number: RevisionNumber,
    pub revision_type: RevisionType,
    pub revision_label: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub changes: Vec<LabeledChange>,
}

impl RevisionDiffResponse {
    /// Label every change of `revision` for display.
    #[must_use]
    pub fn from_revision(revision: &EntityRevision, changes: FieldChanges) -> Self {
        let changes = changes
            .into_iter()
            .map(|(key, change)| LabeledChange {
                label: field_label(&key),
                old_display: format_value(change.old.as_ref()),
                new_display: format_value(change.new.as_ref()),
                key,
                old: change.old,
                new: change.new,
            })
            .collect();

        Self {
            record_id: revision.record_id,
            revision_number: revision.revision_number,
            revision_type: revision.revision_type,
            revision_label: revision.revision_type.action().label().to_string(),
            timestamp: revision.timestamp,
            changes,
        }
    }
}
