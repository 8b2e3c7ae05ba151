//! Shared fixtures for typo-db unit tests.
//!
//! Reader connections need a file-backed store: every connection to
//! `:memory:` would see its own empty database.

use tempfile::TempDir;
use typo_config::HistoryConfig;

use crate::TypoDb;
use crate::history::ChangeLogReader;
use crate::service::HistoryService;
use crate::tables::TableSet;

/// A migrated change-log store in a temp directory.
pub(crate) struct ChangeLogFixture {
    _dir: TempDir,
    path: String,
    db: TypoDb,
    pub tables: TableSet,
    pub config: HistoryConfig,
}

impl ChangeLogFixture {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typo.db").to_str().unwrap().to_string();
        let db = TypoDb::open_local(&path).await.unwrap();
        let config = HistoryConfig::default();
        Self {
            _dir: dir,
            path,
            db,
            tables: TableSet::from_config(&config),
            config,
        }
    }

    pub async fn exec(&self, sql: &str) {
        self.db.conn().execute_batch(sql).await.unwrap();
    }

    pub async fn reader(&self) -> ChangeLogReader<'_> {
        let conn = self.db.reader(true).await.unwrap();
        ChangeLogReader::new(conn, &self.tables, &self.config)
    }

    pub async fn service(&self) -> HistoryService {
        self.service_with(HistoryConfig::default()).await
    }

    pub async fn service_with(&self, config: HistoryConfig) -> HistoryService {
        let db = TypoDb::open_existing(&self.path).await.unwrap();
        HistoryService::new(db, config)
    }

    pub async fn revision(&self, rev: i64, millis: Option<i64>, user: Option<&str>) {
        self.db
            .conn()
            .execute(
                "INSERT INTO revinfo (rev, revtstmp, username) VALUES (?1, ?2, ?3)",
                libsql::params![rev, millis, user],
            )
            .await
            .unwrap();
    }

    pub async fn entity_type(&self, id: i64, code: &str) {
        self.db
            .conn()
            .execute(
                "INSERT INTO entity_type (id, code) VALUES (?1, ?2)",
                libsql::params![id, code],
            )
            .await
            .unwrap();
    }

    pub async fn entity(&self, id: i64, rev: i64, revtype: Option<i64>, code: &str) {
        self.db
            .conn()
            .execute(
                "INSERT INTO entity_aud (id, rev, revtype, code) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![id, rev, revtype, code],
            )
            .await
            .unwrap();
    }

    pub async fn label(&self, id: i64, rev: i64, entity: i64, lang: Option<&str>, name: &str) {
        self.db
            .conn()
            .execute(
                "INSERT INTO label_aud (id, rev, revtype, entity_id, language_code, name)
                 VALUES (?1, ?2, 0, ?3, ?4, ?5)",
                libsql::params![id, rev, entity, lang, name],
            )
            .await
            .unwrap();
    }

    pub async fn description(
        &self,
        id: i64,
        rev: i64,
        entity: i64,
        lang: Option<&str>,
        value: &str,
    ) {
        self.db
            .conn()
            .execute(
                "INSERT INTO description_aud (id, rev, revtype, entity_id, language_code, value)
                 VALUES (?1, ?2, 0, ?3, ?4, ?5)",
                libsql::params![id, rev, entity, lang, value],
            )
            .await
            .unwrap();
    }
}
