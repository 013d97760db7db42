//! # ContactSync Infrastructure
//!
//! Infrastructure implementations of the core ports:
//! - SQLite external reference store (`rusqlite` + `r2d2`)
//! - Google People API directory client and connector
//! - Shared HTTP client with bounded retries
//! - Configuration loading and logging setup

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod logging;

pub use database::{DbManager, SqliteExternalRefStore};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::{GoogleContactsClient, GoogleContactsConnector};
