//! Domain types for contact synchronization

pub mod entity;
pub mod event;
pub mod external_ref;
pub mod result;

pub use entity::{ContactableEntity, EntityKind, LocalId};
pub use event::{ChangeEvent, SyncAction, TriggerCode};
pub use external_ref::{ExternalRef, RefBinding};
pub use result::{SyncResult, SyncStatus};
