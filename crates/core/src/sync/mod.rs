//! Directory synchronization: ports, adapter and host trigger

pub mod adapter;
pub mod locks;
pub mod ports;
pub mod trigger;

pub use adapter::SyncAdapter;
pub use locks::{EntityGuard, EntityLocks};
pub use ports::{DirectoryClient, DirectoryConnector, DirectoryResult, ExternalRefStore};
pub use trigger::ContactSyncTrigger;
