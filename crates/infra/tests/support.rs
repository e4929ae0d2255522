#![allow(dead_code)]

use std::sync::Arc;

use profilesync_core::{Dispatcher, Reconciler, SyncObserver, SyncService};
use profilesync_domain::SyncStatus;
use profilesync_infra::database::{DbManager, SqliteProfileRepository};
use profilesync_infra::http::HttpClient;
use profilesync_infra::observability::SyncMetrics;
use profilesync_infra::source::HttpProfileSource;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with migrations applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("profiles.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    /// Read a stored row straight from SQL, bypassing the repository.
    pub fn row(&self, id: &str) -> Option<StoredRow> {
        let conn = self.manager.get_connection().expect("connection");
        conn.query_row(
            "SELECT name, email, last_updated_at, sync_status, sync_message
             FROM profiles WHERE id = ?1",
            [id],
            |row| {
                Ok(StoredRow {
                    name: row.get(0)?,
                    email: row.get(1)?,
                    last_updated_at: row.get(2)?,
                    sync_status: row.get(3)?,
                    sync_message: row.get(4)?,
                })
            },
        )
        .ok()
    }

    pub fn count(&self) -> i64 {
        let conn = self.manager.get_connection().expect("connection");
        conn.query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0)).expect("count")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub name: String,
    pub email: String,
    pub last_updated_at: String,
    pub sync_status: Option<String>,
    pub sync_message: Option<String>,
}

impl StoredRow {
    pub fn status(&self) -> Option<SyncStatus> {
        self.sync_status.as_deref().and_then(|raw| raw.parse().ok())
    }
}

/// Wire representation of a profile as the upstream sends it.
pub fn wire_profile(id: &str, email: &str, status: &str, updated: &str) -> Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "email": email,
        "mobile": "+1-555-0100",
        "status": status,
        "last_updated_at": updated,
    })
}

/// Fully wired sync service against a real database and HTTP endpoint.
pub struct Pipeline {
    pub db: TestDatabase,
    pub metrics: Arc<SyncMetrics>,
    pub service: Arc<SyncService>,
}

pub fn pipeline(source_url: &str, concurrency: usize) -> Pipeline {
    let db = TestDatabase::new();
    let metrics = Arc::new(SyncMetrics::new());
    let observer: Arc<dyn SyncObserver> = metrics.clone();

    let repository = Arc::new(SqliteProfileRepository::new(Arc::clone(&db.manager)));
    let reconciler = Arc::new(Reconciler::new(repository, Arc::clone(&observer)));
    let dispatcher = Dispatcher::new(reconciler, concurrency).expect("dispatcher");

    let client = HttpClient::builder()
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .expect("http client");
    let source = Arc::new(HttpProfileSource::new(client, source_url));

    let service = Arc::new(SyncService::new(source, dispatcher, observer));
    Pipeline { db, metrics, service }
}

pub fn stored(db: &TestDatabase, id: &str) -> StoredRow {
    db.row(id).unwrap_or_else(|| panic!("row {id} should exist"))
}

