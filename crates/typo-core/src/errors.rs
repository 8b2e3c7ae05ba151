//! Cross-cutting error types.
//!
//! Domain-specific errors (`DatabaseError`, `HistoryError`, `ConfigError`) are
//! defined in their respective crates. The CLI converges them through `anyhow`.

use thiserror::Error;

/// Errors raised while decoding or validating core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A change-type marker outside the known encoding was read.
    #[error("Unknown change-type marker: {0}")]
    UnknownMarker(i64),

    /// Data failed validation (identifier format, field keys).
    #[error("Validation error: {0}")]
    Validation(String),
}
