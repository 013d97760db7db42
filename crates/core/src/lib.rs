//! # ContactSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for directories and reference storage
//! - The stateless [`SyncAdapter`]
//! - The [`ContactSyncTrigger`] host entry point
//!
//! ## Architecture Principles
//! - Only depends on `contactsync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod sync;

pub use sync::ports::{DirectoryClient, DirectoryConnector, DirectoryResult, ExternalRefStore};
pub use sync::{ContactSyncTrigger, EntityLocks, SyncAdapter};
