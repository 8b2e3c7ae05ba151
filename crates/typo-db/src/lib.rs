//! # typo-db
//!
//! libSQL access to the typology thesaurus change logs, and the revision
//! history reconstruction engine built on top of them.
//!
//! Every audited table `t` has an append-only change log `t<suffix>` keyed by
//! `(id, rev)`, and a revision registry maps global revision numbers to
//! commit timestamps. [`service::HistoryService`] reads those logs through a
//! query-only connection and rebuilds per-revision snapshots of one record.

pub mod error;
pub mod helpers;
pub mod history;
mod migrations;
pub mod service;
pub mod tables;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Database handle over a change-log store.
///
/// The writer connection is used for schema bootstrap and seeding. Readers
/// for history reconstruction come from [`TypoDb::reader`].
pub struct TypoDb {
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TypoDb {
    /// Open a local database at the given path and bootstrap the change-log
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Self::open_existing(path).await?;
        db.run_migrations().await?;
        Ok(db)
    }

    /// Open a local database without touching its schema.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open_existing(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        Ok(Self { db, conn })
    }

    /// Access the writer connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Open a fresh connection for reading change logs.
    ///
    /// With `query_only`, the connection rejects every write, so history
    /// reads can never hold a write transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established.
    pub async fn reader(&self, query_only: bool) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.db.connect()?;
        if query_only {
            conn.execute("PRAGMA query_only = ON", ())
                .await
                .map_err(|e| DatabaseError::Query(format!("PRAGMA query_only: {e}")))?;
        }
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_names(db: &TypoDb) -> Vec<String> {
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                (),
            )
            .await
            .unwrap();
        let mut names = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            names.push(row.get::<String>(0).unwrap());
        }
        names
    }

    #[tokio::test]
    async fn open_local_creates_change_log_schema() {
        let db = TypoDb::open_local(":memory:").await.unwrap();
        let names = table_names(&db).await;

        for expected in [
            "revinfo",
            "entity_type",
            "entity_aud",
            "label_aud",
            "description_aud",
            "description_detail_aud",
            "physical_characteristic_aud",
            "paste_description_aud",
            "reference_opentheso_aud",
            "entity_metadata_aud",
        ] {
            assert!(
                names.iter().any(|n| n == expected),
                "missing table {expected}: {names:?}"
            );
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = TypoDb::open_local(":memory:").await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn query_only_reader_rejects_writes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("typo.db");
        let db = TypoDb::open_local(path.to_str().unwrap()).await.unwrap();

        let reader = db.reader(true).await.unwrap();
        let result = reader
            .execute("INSERT INTO revinfo (rev, revtstmp) VALUES (1, 0)", ())
            .await;
        assert!(result.is_err(), "query-only reader accepted a write");

        let mut rows = reader.query("SELECT count(*) FROM revinfo", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0);
    }
}
