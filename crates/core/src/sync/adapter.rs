//! Entity-to-directory sync adapter
//!
//! Maps one [`ChangeEvent`] to directory calls with upsert semantics:
//!
//! | action | reference            | directory calls                      | status                 |
//! |--------|----------------------|--------------------------------------|------------------------|
//! | Create | any                  | create                               | Created / Failed       |
//! | Modify | bound to provider    | update, then create on `NotFound`    | Updated / Created / Failed |
//! | Modify | absent               | create                               | Created / Failed       |
//! | Modify | foreign or malformed | none                                 | Skipped                |
//! | Delete | bound to provider    | delete                               | Deleted / Failed       |
//! | Delete | absent or foreign    | none                                 | Skipped                |
//!
//! The adapter never touches persistence. It returns the reference to commit
//! and leaves committing to the caller.

use contactsync_domain::{
    ChangeEvent, ContactableEntity, DirectoryError, EntityKind, ExternalRef, RefBinding,
    SyncAction, SyncResult,
};

use super::ports::DirectoryClient;

/// Stateless translator from change events to directory operations.
///
/// Holds nothing between calls, so one instance can be shared across
/// entities and tasks. Callers must serialize calls for the same entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncAdapter;

impl SyncAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Handle one event against `client`.
    pub async fn handle(&self, event: &ChangeEvent, client: &dyn DirectoryClient) -> SyncResult {
        let binding = RefBinding::classify(event.entity.external_ref.as_deref(), client.provider());

        match (event.action, binding) {
            (SyncAction::Create, _) | (SyncAction::Modify, RefBinding::Unsynced) => {
                create(client, event.entity_kind, &event.entity).await
            }
            (SyncAction::Modify, RefBinding::Bound(reference)) => {
                match client.update_contact(reference.id(), event.entity_kind, &event.entity).await
                {
                    Ok(()) => SyncResult::updated(reference),
                    // Remote record was removed independently: re-create it
                    Err(err) if err.is_not_found() => {
                        create(client, event.entity_kind, &event.entity).await
                    }
                    Err(err) => SyncResult::failed(err),
                }
            }
            (SyncAction::Delete, RefBinding::Bound(reference)) => {
                match client.delete_contact_by_ref(reference.id()).await {
                    Ok(()) => SyncResult::deleted(),
                    Err(err) => SyncResult::failed(err),
                }
            }
            (SyncAction::Modify | SyncAction::Delete, RefBinding::Foreign)
            | (SyncAction::Delete, RefBinding::Unsynced) => SyncResult::skipped(),
        }
    }
}

async fn create(
    client: &dyn DirectoryClient,
    kind: EntityKind,
    entity: &ContactableEntity,
) -> SyncResult {
    let id = match client.create_contact(kind, entity).await {
        Ok(id) => id,
        Err(err) => return SyncResult::failed(err),
    };

    match ExternalRef::new(client.provider(), id) {
        Ok(reference) => SyncResult::created(reference),
        // The remote record exists but cannot be referenced
        Err(err) => SyncResult::failed(DirectoryError::unknown(format!(
            "{} returned an unusable contact id: {err}",
            client.provider()
        ))),
    }
}
