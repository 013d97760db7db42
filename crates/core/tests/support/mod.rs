//! Shared test helpers for `contactsync-core` integration tests.
//!
//! Lightweight in-memory stand-ins for the directory, the connector and the
//! reference store, so tests can focus on behaviour instead of plumbing.

#![allow(dead_code, unused_imports)]

pub mod directory;
pub mod store;

pub use directory::{Call, RecordingDirectoryClient, StaticConnector};
pub use store::InMemoryExternalRefStore;
