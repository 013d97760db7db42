//! SQLite-backed `ExternalRefStore`

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use contactsync_core::ExternalRefStore;
use contactsync_domain::{ContactSyncError, EntityKind, ExternalRef, LocalId, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;
use tracing::debug;

use super::manager::{map_sql_error, DbManager};

/// Persists one external reference per `(entity_kind, local_id)`.
pub struct SqliteExternalRefStore {
    db: Arc<DbManager>,
}

impl SqliteExternalRefStore {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Fresh in-memory store with the schema applied.
    pub fn open_in_memory() -> Result<Self> {
        let db = DbManager::in_memory()?;
        db.run_migrations()?;
        Ok(Self::new(Arc::new(db)))
    }

    /// Apply the schema.
    pub async fn migrate(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || db.run_migrations()).await.map_err(map_join_error)?
    }

    /// Number of stored references.
    pub async fn count(&self) -> Result<u64> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<u64> {
            let conn = db.get_connection()?;
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM contact_external_refs", [], |row| row.get(0))
                .map_err(map_sql_error)?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl ExternalRefStore for SqliteExternalRefStore {
    async fn load(&self, kind: EntityKind, local_id: LocalId) -> Result<Option<ExternalRef>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<ExternalRef>> {
            let conn = db.get_connection()?;
            query_external_ref(&conn, kind, local_id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save(&self, kind: EntityKind, local_id: LocalId, reference: &ExternalRef) -> Result<()> {
        let db = Arc::clone(&self.db);
        let reference = reference.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            upsert_external_ref(&conn, kind, local_id, &reference)?;
            debug!(%kind, %local_id, external_ref = %reference, "stored external reference");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn clear(&self, kind: EntityKind, local_id: LocalId) -> Result<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let removed = conn
                .execute(
                    "DELETE FROM contact_external_refs WHERE entity_kind = ?1 AND local_id = ?2",
                    params![kind.as_str(), local_id.0],
                )
                .map_err(map_sql_error)?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// SQL Operations (synchronous)
// ============================================================================

fn query_external_ref(
    conn: &Connection,
    kind: EntityKind,
    local_id: LocalId,
) -> Result<Option<ExternalRef>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT external_ref FROM contact_external_refs WHERE entity_kind = ?1 AND local_id = ?2",
            params![kind.as_str(), local_id.0],
            |row| row.get(0),
        )
        .optional()
        .map_err(map_sql_error)?;

    raw.map(|value| {
        value.parse::<ExternalRef>().map_err(|_| {
            ContactSyncError::Database(format!(
                "corrupt external reference {value:?} for {kind} {local_id}"
            ))
        })
    })
    .transpose()
}

fn upsert_external_ref(
    conn: &Connection,
    kind: EntityKind,
    local_id: LocalId,
    reference: &str,
) -> Result<()> {
    conn.execute(
        "INSERT INTO contact_external_refs (entity_kind, local_id, external_ref, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (entity_kind, local_id)
         DO UPDATE SET external_ref = excluded.external_ref, updated_at = excluded.updated_at",
        params![kind.as_str(), local_id.0, reference, Utc::now().timestamp()],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

fn map_join_error(err: task::JoinError) -> ContactSyncError {
    if err.is_cancelled() {
        ContactSyncError::Internal("blocking task cancelled".into())
    } else {
        ContactSyncError::Internal(format!("blocking task panicked: {err}"))
    }
}
