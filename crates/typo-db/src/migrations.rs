//! Change-log schema bootstrap.
//!
//! Embeds the SQL migration files at compile time. All statements use
//! `IF NOT EXISTS`, so running them against an existing store is a no-op.

use crate::TypoDb;
use crate::error::DatabaseError;

/// Revision registry, entity-type lookup and every `*_aud` change log.
const MIGRATION_001: &str = include_str!("../migrations/001_change_logs.sql");

impl TypoDb {
    /// Run all embedded migrations in sequence.
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(MIGRATION_001)
            .await
            .map_err(|e| DatabaseError::Migration(format!("001_change_logs: {e}")))?;
        Ok(())
    }
}
