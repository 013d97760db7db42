use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contactsync_core::{DirectoryClient, DirectoryConnector, DirectoryResult};
use contactsync_domain::{ContactableEntity, DirectoryError, EntityKind};

/// One recorded directory call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { kind: EntityKind, name: String },
    Update { id: String },
    Delete { id: String },
}

/// Mock `DirectoryClient` recording every call.
///
/// Creates return `abc1`, `abc2`, ... so every create yields a new, distinct
/// remote record. Update/delete outcomes can be scripted; unscripted calls
/// succeed.
pub struct RecordingDirectoryClient {
    provider: String,
    next_id: AtomicUsize,
    calls: Mutex<Vec<Call>>,
    create_errors: Mutex<VecDeque<DirectoryError>>,
    update_errors: Mutex<VecDeque<DirectoryError>>,
    delete_errors: Mutex<VecDeque<DirectoryError>>,
}

impl RecordingDirectoryClient {
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
            next_id: AtomicUsize::new(1),
            calls: Mutex::new(Vec::new()),
            create_errors: Mutex::new(VecDeque::new()),
            update_errors: Mutex::new(VecDeque::new()),
            delete_errors: Mutex::new(VecDeque::new()),
        }
    }

    pub fn google() -> Self {
        Self::new("google")
    }

    /// Start the id sequence at `n` (`abc<n>`).
    pub fn starting_at(self, n: usize) -> Self {
        self.next_id.store(n, Ordering::SeqCst);
        self
    }

    pub fn fail_next_create(self, error: DirectoryError) -> Self {
        self.create_errors.lock().unwrap().push_back(error);
        self
    }

    pub fn fail_next_update(self, error: DirectoryError) -> Self {
        self.update_errors.lock().unwrap().push_back(error);
        self
    }

    pub fn fail_next_delete(self, error: DirectoryError) -> Self {
        self.delete_errors.lock().unwrap().push_back(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_count(&self) -> usize {
        self.calls().iter().filter(|call| matches!(call, Call::Create { .. })).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DirectoryClient for RecordingDirectoryClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn create_contact(
        &self,
        kind: EntityKind,
        entity: &ContactableEntity,
    ) -> DirectoryResult<String> {
        self.record(Call::Create { kind, name: entity.display_name.clone() });
        if let Some(err) = self.create_errors.lock().unwrap().pop_front() {
            return Err(err);
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(format!("abc{n}"))
    }

    async fn update_contact(
        &self,
        id: &str,
        _kind: EntityKind,
        _entity: &ContactableEntity,
    ) -> DirectoryResult<()> {
        self.record(Call::Update { id: id.to_string() });
        match self.update_errors.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn delete_contact_by_ref(&self, id: &str) -> DirectoryResult<()> {
        self.record(Call::Delete { id: id.to_string() });
        match self.delete_errors.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Connector returning a fixed outcome and counting connection attempts.
pub struct StaticConnector {
    outcome: Result<Option<Arc<RecordingDirectoryClient>>, DirectoryError>,
    attempts: AtomicUsize,
}

impl StaticConnector {
    pub fn connected(client: Arc<RecordingDirectoryClient>) -> Self {
        Self { outcome: Ok(Some(client)), attempts: AtomicUsize::new(0) }
    }

    pub fn missing_credentials() -> Self {
        Self { outcome: Ok(None), attempts: AtomicUsize::new(0) }
    }

    pub fn failing(error: DirectoryError) -> Self {
        Self { outcome: Err(error), attempts: AtomicUsize::new(0) }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryConnector for StaticConnector {
    async fn connect(&self) -> DirectoryResult<Option<Arc<dyn DirectoryClient>>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(Some(client)) => Ok(Some(Arc::clone(client) as Arc<dyn DirectoryClient>)),
            Ok(None) => Ok(None),
            Err(err) => Err(err.clone()),
        }
    }
}
