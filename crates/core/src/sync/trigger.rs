//! Contact sync trigger - host-facing entry point
//!
//! Wraps [`SyncAdapter`] with everything the host used to do around it:
//! configuration gating, connecting to the directory, per-entity
//! serialization and committing the returned reference.

use std::sync::Arc;

use contactsync_domain::{
    ChangeEvent, ContactSyncError, ContactableEntity, Result, SyncResult, SyncSettings, SyncStatus,
};
use tracing::{debug, error, info, instrument, warn};

use super::adapter::SyncAdapter;
use super::locks::EntityLocks;
use super::ports::{DirectoryConnector, ExternalRefStore};

/// Runs change events through the adapter and persists the outcome.
pub struct ContactSyncTrigger {
    settings: SyncSettings,
    connector: Arc<dyn DirectoryConnector>,
    store: Arc<dyn ExternalRefStore>,
    adapter: SyncAdapter,
    locks: EntityLocks,
}

impl ContactSyncTrigger {
    /// Create a new trigger
    pub fn new(
        settings: SyncSettings,
        connector: Arc<dyn DirectoryConnector>,
        store: Arc<dyn ExternalRefStore>,
    ) -> Self {
        Self { settings, connector, store, adapter: SyncAdapter::new(), locks: EntityLocks::new() }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Handle a host event given by its legacy code (`COMPANY_CREATE`, ...).
    ///
    /// Codes unrelated to companies or contacts are skipped.
    pub async fn run_code(&self, code: &str, entity: ContactableEntity) -> Result<SyncResult> {
        match ChangeEvent::from_trigger_code(code, entity) {
            Ok(event) => self.run(event).await,
            Err(ContactSyncError::InvalidInput(_)) => {
                debug!(code, "trigger code not handled by contact sync");
                Ok(SyncResult::skipped())
            }
            Err(err) => Err(err),
        }
    }

    /// Synchronize one change event.
    ///
    /// Directory failures come back as `Ok` with [`SyncStatus::Failed`];
    /// `Err` is reserved for failures of the reference store, which happen
    /// after the directory call.
    #[instrument(
        skip(self, event),
        fields(
            entity_kind = %event.entity_kind,
            local_id = %event.entity.local_id,
            action = %event.action,
        )
    )]
    pub async fn run(&self, mut event: ChangeEvent) -> Result<SyncResult> {
        if !self.settings.is_active() {
            if self.settings.enabled {
                debug!("duplication into contacts disabled");
            } else {
                debug!("contact sync module disabled");
            }
            return Ok(SyncResult::skipped());
        }

        let kind = event.entity_kind;
        let local_id = event.entity.local_id;
        let _guard = self.locks.acquire(kind, local_id).await;

        // The store wins over the snapshot for references it committed itself
        if let Some(stored) = self.store.load(kind, local_id).await? {
            event.entity.external_ref = Some(stored.to_string());
        }

        let client = match self.connector.connect().await {
            Ok(Some(client)) => client,
            Ok(None) => {
                warn!("contact sync is on but directory credentials are incomplete");
                return Ok(SyncResult::skipped());
            }
            Err(err) => {
                error!(error = %err, "failed to connect to contact directory");
                return Ok(SyncResult::failed(err));
            }
        };

        let provider = client.provider().to_owned();
        let result = self.adapter.handle(&event, client.as_ref()).await;

        self.commit(&event, &result).await?;
        log_outcome(&provider, &result);

        Ok(result)
    }

    async fn commit(&self, event: &ChangeEvent, result: &SyncResult) -> Result<()> {
        let kind = event.entity_kind;
        let local_id = event.entity.local_id;

        match (result.status, result.new_external_ref.as_ref()) {
            (SyncStatus::Created, Some(reference)) => {
                self.store.save(kind, local_id, reference).await
            }
            (SyncStatus::Deleted, _) => {
                let existed = self.store.clear(kind, local_id).await?;
                debug!(existed, "cleared stored external reference");
                Ok(())
            }
            (SyncStatus::Created, None) => Err(ContactSyncError::Internal(
                "created result without an external reference".into(),
            )),
            _ => Ok(()),
        }
    }
}

fn log_outcome(provider: &str, result: &SyncResult) {
    let status = result.status.as_str();
    let reference = result.new_external_ref.as_ref().map(ToString::to_string);

    match &result.error {
        Some(err) => warn!(
            provider,
            status,
            error_kind = %err.kind,
            retryable = err.is_retryable(),
            error = %err.message,
            "contact sync failed"
        ),
        None => info!(provider, status, external_ref = ?reference, "contact sync completed"),
    }
}
