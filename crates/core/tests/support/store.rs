use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use contactsync_core::ExternalRefStore;
use contactsync_domain::{
    ContactSyncError, EntityKind, ExternalRef, LocalId, Result as DomainResult,
};

/// In-memory mock for `ExternalRefStore`.
#[derive(Default)]
pub struct InMemoryExternalRefStore {
    refs: Mutex<HashMap<(EntityKind, LocalId), ExternalRef>>,
    fail_writes: bool,
}

impl InMemoryExternalRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose `save`/`clear` always fail with a database error.
    pub fn failing_writes() -> Self {
        Self { refs: Mutex::new(HashMap::new()), fail_writes: true }
    }

    pub fn with_ref(self, kind: EntityKind, local_id: i64, reference: &str) -> Self {
        self.refs.lock().unwrap().insert((kind, LocalId(local_id)), reference.parse().unwrap());
        self
    }

    pub fn get(&self, kind: EntityKind, local_id: i64) -> Option<String> {
        self.refs.lock().unwrap().get(&(kind, LocalId(local_id))).map(ToString::to_string)
    }
}

#[async_trait]
impl ExternalRefStore for InMemoryExternalRefStore {
    async fn load(&self, kind: EntityKind, local_id: LocalId) -> DomainResult<Option<ExternalRef>> {
        Ok(self.refs.lock().unwrap().get(&(kind, local_id)).cloned())
    }

    async fn save(
        &self,
        kind: EntityKind,
        local_id: LocalId,
        reference: &ExternalRef,
    ) -> DomainResult<()> {
        if self.fail_writes {
            return Err(ContactSyncError::Database("disk full".into()));
        }
        self.refs.lock().unwrap().insert((kind, local_id), reference.clone());
        Ok(())
    }

    async fn clear(&self, kind: EntityKind, local_id: LocalId) -> DomainResult<bool> {
        if self.fail_writes {
            return Err(ContactSyncError::Database("disk full".into()));
        }
        Ok(self.refs.lock().unwrap().remove(&(kind, local_id)).is_some())
    }
}
