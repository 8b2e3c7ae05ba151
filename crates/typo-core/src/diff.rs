//! Field-level diff between two adjacent snapshots.
//!
//! Scalar fields compare by value. Map fields (labels, descriptions,
//! references) first compare as whole maps; when they differ they are fanned
//! out into one entry per differing key, named `field.key`, and the coarse
//! `field` entry is not reported.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{FieldValue, Snapshot};

/// Old and new value of one field key between two revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldChange {
    pub old: Option<FieldValue>,
    pub new: Option<FieldValue>,
}

impl FieldChange {
    #[must_use]
    pub const fn new(old: Option<FieldValue>, new: Option<FieldValue>) -> Self {
        Self { old, new }
    }
}

/// Changes keyed by field key. Iteration order carries no meaning.
pub type FieldChanges = BTreeMap<String, FieldChange>;

/// Build the key for one entry of a map field, e.g. `labels.fr`.
#[must_use]
pub fn entry_key(field: &str, key: &str) -> String {
    format!("{field}.{key}")
}

/// Split a diff key into its field and optional map entry key.
#[must_use]
pub fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once('.') {
        Some((field, entry)) => (field, Some(entry)),
        None => (key, None),
    }
}

/// Compute the changes from `previous` to `current`.
///
/// With no previous snapshot (or an empty one) every current field is
/// reported as newly set, map fields included as a whole.
#[must_use]
pub fn diff_snapshots(current: &Snapshot, previous: Option<&Snapshot>) -> FieldChanges {
    let Some(previous) = previous.filter(|p| !p.is_empty()) else {
        return current
            .iter()
            .map(|(field, value)| {
                (field.to_string(), FieldChange::new(None, Some(value.clone())))
            })
            .collect();
    };

    let fields: BTreeSet<&str> = current.fields().chain(previous.fields()).collect();
    let mut changes = FieldChanges::new();

    for field in fields {
        let old = previous.get(field);
        let new = current.get(field);
        if old == new {
            continue;
        }

        match (old, new) {
            (Some(FieldValue::Map(o)), Some(FieldValue::Map(n))) => {
                fan_out(field, Some(o), Some(n), &mut changes);
            }
            (None, Some(FieldValue::Map(n))) => fan_out(field, None, Some(n), &mut changes),
            (Some(FieldValue::Map(o)), None) => fan_out(field, Some(o), None, &mut changes),
            _ => {
                changes.insert(field.to_string(), FieldChange::new(old.cloned(), new.cloned()));
            }
        }
    }

    changes
}

fn fan_out(
    field: &str,
    old: Option<&BTreeMap<String, String>>,
    new: Option<&BTreeMap<String, String>>,
    changes: &mut FieldChanges,
) {
    let keys: BTreeSet<&String> = old
        .into_iter()
        .flat_map(BTreeMap::keys)
        .chain(new.into_iter().flat_map(BTreeMap::keys))
        .collect();

    for key in keys {
        let old_text = old.and_then(|m| m.get(key));
        let new_text = new.and_then(|m| m.get(key));
        if old_text != new_text {
            changes.insert(
                entry_key(field, key),
                FieldChange::new(
                    old_text.cloned().map(FieldValue::Text),
                    new_text.cloned().map(FieldValue::Text),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn map(entries: &[(&str, &str)]) -> FieldValue {
        FieldValue::Map(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn text(s: &str) -> Option<FieldValue> {
        Some(FieldValue::from(s))
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let snapshot: Snapshot = [
            ("code", FieldValue::from("AMP-01")),
            ("labels", map(&[("fr", "Amphore"), ("en", "Amphora")])),
        ]
        .into_iter()
        .collect();

        assert!(diff_snapshots(&snapshot, Some(&snapshot.clone())).is_empty());
    }

    #[test]
    fn multilingual_change_fans_out_per_language() {
        let current: Snapshot = [("labels", map(&[("fr", "A"), ("en", "B")]))]
            .into_iter()
            .collect();
        let previous: Snapshot = [("labels", map(&[("fr", "A"), ("en", "C")]))]
            .into_iter()
            .collect();

        let changes = diff_snapshots(&current, Some(&previous));

        let expected = FieldChanges::from([("labels.en".to_string(), FieldChange::new(text("C"), text("B")))]);
        assert_eq!(changes, expected);
        assert!(!changes.contains_key("labels"));
        assert!(!changes.contains_key("labels.fr"));
    }

    #[test]
    fn creation_reports_every_field_as_new() {
        let current: Snapshot = [("code", FieldValue::from("X"))].into_iter().collect();

        let changes = diff_snapshots(&current, None);

        assert_eq!(
            changes,
            FieldChanges::from([("code".to_string(), FieldChange::new(None, text("X")))])
        );
    }

    #[test]
    fn empty_previous_behaves_like_absent() {
        let current: Snapshot = [
            ("code", FieldValue::from("X")),
            ("labels", map(&[("fr", "A")])),
        ]
        .into_iter()
        .collect();

        let changes = diff_snapshots(&current, Some(&Snapshot::new()));

        assert_eq!(changes.len(), 2);
        assert_eq!(changes["labels"].new, Some(map(&[("fr", "A")])));
        assert_eq!(changes["labels"].old, None);
    }

    #[test]
    fn disappearing_scalar_is_reported() {
        let current: Snapshot = [("code", FieldValue::from("X"))].into_iter().collect();
        let previous: Snapshot = [
            ("code", FieldValue::from("X")),
            ("status", FieldValue::from("draft")),
        ]
        .into_iter()
        .collect();

        let changes = diff_snapshots(&current, Some(&previous));

        assert_eq!(
            changes,
            FieldChanges::from([("status".to_string(), FieldChange::new(text("draft"), None))])
        );
    }

    #[rstest]
    #[case::appeared(None, Some(vec![("fr", "A"), ("en", "B")]), &["descriptions.en", "descriptions.fr"])]
    #[case::disappeared(Some(vec![("de", "D")]), None, &["descriptions.de"])]
    #[case::language_added(Some(vec![("fr", "A")]), Some(vec![("fr", "A"), ("it", "I")]), &["descriptions.it"])]
    #[case::language_removed(Some(vec![("fr", "A"), ("it", "I")]), Some(vec![("fr", "A")]), &["descriptions.it"])]
    fn map_field_transitions_fan_out(
        #[case] old: Option<Vec<(&str, &str)>>,
        #[case] new: Option<Vec<(&str, &str)>>,
        #[case] expected_keys: &[&str],
    ) {
        let mut previous = Snapshot::new();
        previous.insert("code", "X");
        let mut current = previous.clone();
        if let Some(entries) = old {
            previous.insert("descriptions", map(&entries));
        }
        if let Some(entries) = new {
            current.insert("descriptions", map(&entries));
        }

        let changes = diff_snapshots(&current, Some(&previous));

        let keys: Vec<&str> = changes.keys().map(String::as_str).collect();
        assert_eq!(keys, expected_keys);
    }

    #[test]
    fn type_change_between_scalar_and_map_stays_coarse() {
        let current: Snapshot = [("references", map(&[("pactols", "x")]))].into_iter().collect();
        let previous: Snapshot = [("references", FieldValue::from("x"))].into_iter().collect();

        let changes = diff_snapshots(&current, Some(&previous));

        assert_eq!(changes.len(), 1);
        assert!(changes.contains_key("references"));
    }

    #[rstest]
    #[case("labels.fr", ("labels", Some("fr")))]
    #[case("code", ("code", None))]
    fn split_key_separates_entry(#[case] key: &str, #[case] expected: (&str, Option<&str>)) {
        assert_eq!(split_key(key), expected);
    }
}
