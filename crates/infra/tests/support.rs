#![allow(dead_code)]

use std::sync::Arc;

use contactsync_infra::database::{DbManager, SqliteExternalRefStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new migrated temporary database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = open(&temp_dir);
        Self { manager, temp_dir }
    }

    /// Open a second manager on the same file.
    pub fn reopen(&self) -> Arc<DbManager> {
        open(&self.temp_dir)
    }

    pub fn store(&self) -> SqliteExternalRefStore {
        SqliteExternalRefStore::new(Arc::clone(&self.manager))
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn open(temp_dir: &TempDir) -> Arc<DbManager> {
    let manager =
        DbManager::new(temp_dir.path().join("refs.db"), 4).expect("db manager should be created");
    manager.run_migrations().expect("migrations should run");
    Arc::new(manager)
}

/// Mount a People API create endpoint answering with `people/<id>`.
pub async fn mount_create(server: &MockServer, id: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/people:createContact"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "resourceName": format!("people/{id}"), "etag": "e0" })),
        )
        .expect(times)
        .mount(server)
        .await;
}
