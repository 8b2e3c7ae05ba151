//! Error types for typo-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Invalid state encountered (e.g., bad data in a change log).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

/// Errors surfaced by history reconstruction.
///
/// Per-table and per-revision faults are absorbed inside the engine. Only a
/// store that cannot be read at all reaches the caller.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The change-log store cannot be reached or read.
    #[error("Change-log store unavailable: {0}")]
    StoreUnavailable(String),
}
