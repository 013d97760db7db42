//! Port interfaces for directory synchronization

use std::sync::Arc;

use async_trait::async_trait;
use contactsync_domain::{
    ContactableEntity, DirectoryError, EntityKind, ExternalRef, LocalId, Result,
};

/// Result of a single directory operation
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Authenticated handle on an external contact directory.
///
/// Implementations own transport concerns (timeouts, auth headers). Ids
/// passed in and returned are the provider-specific part of an
/// [`ExternalRef`], without the provider tag.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Provider tag written into external references (e.g. `"google"`)
    fn provider(&self) -> &str;

    /// Create a remote contact and return its provider id
    async fn create_contact(
        &self,
        kind: EntityKind,
        entity: &ContactableEntity,
    ) -> DirectoryResult<String>;

    /// Overwrite the remote contact `id` with the entity's current state.
    ///
    /// Must report a missing remote record with
    /// [`DirectoryErrorKind::NotFound`](contactsync_domain::DirectoryErrorKind::NotFound).
    async fn update_contact(
        &self,
        id: &str,
        kind: EntityKind,
        entity: &ContactableEntity,
    ) -> DirectoryResult<()>;

    /// Delete the remote contact `id`
    async fn delete_contact_by_ref(&self, id: &str) -> DirectoryResult<()>;
}

/// Produces authenticated directory clients from configured credentials.
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Returns `Ok(None)` when credentials are incomplete, so the caller can
    /// skip without treating it as a failure.
    async fn connect(&self) -> DirectoryResult<Option<Arc<dyn DirectoryClient>>>;
}

/// Durable storage for external references, keyed by entity kind and id
#[async_trait]
pub trait ExternalRefStore: Send + Sync {
    /// Get the stored reference, if any
    async fn load(&self, kind: EntityKind, local_id: LocalId) -> Result<Option<ExternalRef>>;

    /// Insert or replace the stored reference
    async fn save(&self, kind: EntityKind, local_id: LocalId, reference: &ExternalRef)
        -> Result<()>;

    /// Remove the stored reference; returns whether one existed
    async fn clear(&self, kind: EntityKind, local_id: LocalId) -> Result<bool>;
}
