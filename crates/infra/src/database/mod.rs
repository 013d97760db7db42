//! SQLite persistence for external references

pub mod external_ref_store;
pub mod manager;

pub use external_ref_store::SqliteExternalRefStore;
pub use manager::{DbConnection, DbManager};
