//! Field labels and display formatting for history views.
//!
//! Presentation layers pass diff keys (`code`, `labels.fr`) through
//! [`field_label`] to get a readable column name. Unknown keys fall back to a
//! title-cased version of the key.

use crate::diff::split_key;
use crate::entities::FieldValue;

/// Placeholder shown for an unset value.
pub const NO_VALUE: &str = "No value";

const FIELD_LABELS: &[(&str, &str)] = &[
    ("id", "Identifier"),
    ("code", "Code"),
    ("name", "Name"),
    ("entity_type_code", "Entity type"),
    ("status", "Status"),
    ("is_public", "Public"),
    ("created_at", "Created at"),
    ("created_by", "Created by"),
    ("labels", "Labels"),
    ("descriptions", "Descriptions"),
    ("references", "External references"),
    ("decors", "Decorations"),
    ("marks", "Marks"),
    ("metrology", "Metrology"),
    ("function_usage", "Function / usage"),
    ("materials", "Materials"),
    ("manufacturing", "Manufacturing"),
    ("paste_description", "Paste description"),
    ("paste_color", "Paste colour"),
    ("paste_nature", "Paste nature"),
    ("inclusions", "Inclusions"),
    ("firing", "Firing / post-firing"),
    ("comment", "Comment"),
    ("bibliography", "Bibliography"),
    ("appellation", "Appellation"),
    ("reference", "Reference"),
    ("scientific_typology", "Scientific typology"),
    ("persistent_identifier", "Persistent identifier"),
    ("previous_version", "Previous version"),
    ("tpq", "TPQ"),
    ("taq", "TAQ"),
    ("workshops", "Workshop(s)"),
    ("attestations", "Attestations"),
    ("archaeological_sites", "Archaeological sites"),
];

/// Human-readable label for a diff key.
///
/// Map entry keys render as `"<field label> (<entry>)"`, e.g.
/// `labels.fr` → `"Labels (fr)"`.
#[must_use]
pub fn field_label(key: &str) -> String {
    let (field, entry) = split_key(key);
    let base = FIELD_LABELS
        .iter()
        .find(|(k, _)| *k == field)
        .map_or_else(|| title_case(field), |(_, label)| (*label).to_string());

    match entry {
        Some(entry) => format!("{base} ({entry})"),
        None => base,
    }
}

/// Render an optional field value for display.
#[must_use]
pub fn format_value(value: Option<&FieldValue>) -> String {
    match value {
        None => NO_VALUE.to_string(),
        Some(FieldValue::Bool(true)) => "Yes".to_string(),
        Some(FieldValue::Bool(false)) => "No".to_string(),
        Some(FieldValue::Text(s)) if s.is_empty() => NO_VALUE.to_string(),
        Some(other) => other.to_string(),
    }
}

fn title_case(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
