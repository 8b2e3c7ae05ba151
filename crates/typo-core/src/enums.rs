//! Revision actions and the classified revision type.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// RevisionAction
// ---------------------------------------------------------------------------

/// What a revision did to the primary record.
///
/// Change logs encode this as an integer marker column:
///
/// ```text
/// 0 → create
/// 1 → modify
/// 2 → delete
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RevisionAction {
    Create,
    Modify,
    Delete,
}

impl RevisionAction {
    /// Decode a change-log marker.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownMarker` for values outside `0..=2`.
    pub fn from_marker(marker: i64) -> Result<Self, CoreError> {
        match marker {
            0 => Ok(Self::Create),
            1 => Ok(Self::Modify),
            2 => Ok(Self::Delete),
            other => Err(CoreError::UnknownMarker(other)),
        }
    }

    #[must_use]
    pub const fn marker(self) -> i64 {
        match self {
            Self::Create => 0,
            Self::Modify => 1,
            Self::Delete => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Delete => "delete",
        }
    }

    /// Human-readable label for history listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "Creation",
            Self::Modify => "Modification",
            Self::Delete => "Deletion",
        }
    }
}

impl fmt::Display for RevisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RevisionType
// ---------------------------------------------------------------------------

/// A revision action together with how it was determined.
///
/// `Authoritative` comes from an explicit marker on the primary record's own
/// change-log row. `Heuristic` is the best-effort positional fallback used when
/// no marker exists, and may be wrong.
///
/// Serialized as `{"source": "heuristic", "action": "modify"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "source", content = "action", rename_all = "snake_case")]
pub enum RevisionType {
    Authoritative(RevisionAction),
    Heuristic(RevisionAction),
}

impl RevisionType {
    #[must_use]
    pub const fn action(self) -> RevisionAction {
        match self {
            Self::Authoritative(action) | Self::Heuristic(action) => action,
        }
    }

    #[must_use]
    pub const fn is_authoritative(self) -> bool {
        matches!(self, Self::Authoritative(_))
    }
}

impl fmt::Display for RevisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authoritative(action) => write!(f, "{action}"),
            Self::Heuristic(action) => write!(f, "{action} (heuristic)"),
        }
    }
}
