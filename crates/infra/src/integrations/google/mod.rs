//! Google Contacts directory (People API)
//!
//! [`GoogleContactsConnector`] turns the configured credentials into an
//! authenticated [`GoogleContactsClient`], which implements the core
//! `DirectoryClient` port.

pub mod client;
pub mod connector;
pub mod types;

pub use client::GoogleContactsClient;
pub use connector::GoogleContactsConnector;

/// Provider tag written into external references
pub const GOOGLE_PROVIDER: &str = "google";
