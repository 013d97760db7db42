//! Per-entity serialization
//!
//! Two events for the same entity must not interleave: both could read an
//! absent reference and create two remote contacts.

use std::sync::Arc;

use contactsync_domain::{EntityKind, LocalId};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type EntityKey = (EntityKind, LocalId);

/// Async lock table keyed by entity. Unrelated entities never contend.
#[derive(Default)]
pub struct EntityLocks {
    locks: DashMap<EntityKey, Arc<Mutex<()>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the entity.
    pub async fn acquire(&self, kind: EntityKind, local_id: LocalId) -> EntityGuard<'_> {
        let key = (kind, local_id);
        // Clone out of the map before awaiting so no shard lock is held
        let lock = Arc::clone(self.locks.entry(key).or_default().value());
        let guard = lock.lock_owned().await;
        EntityGuard { table: self, key, guard: Some(guard) }
    }

    /// Number of entities with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one entity; the table entry is dropped once nobody
/// else is waiting on it.
pub struct EntityGuard<'a> {
    table: &'a EntityLocks,
    key: EntityKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EntityGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own Arc left means no holder and no waiter
        self.table.locks.remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
