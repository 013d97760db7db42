//! External directory integrations

pub mod google;

pub use google::{GoogleContactsClient, GoogleContactsConnector, GOOGLE_PROVIDER};
