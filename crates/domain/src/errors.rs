//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ContactSync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ContactSyncError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for ContactSync operations
pub type Result<T> = std::result::Result<T, ContactSyncError>;

/// Classification of a failure reported by a directory provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryErrorKind {
    /// Credentials were rejected (401/403, failed token exchange)
    AuthFailure,
    /// The remote record does not exist anymore
    NotFound,
    /// Timeouts, connection failures, throttling and 5xx responses
    TransientNetwork,
    /// The provider refused the payload (malformed entity, other 4xx)
    PermanentRejection,
    /// Anything that could not be classified
    Unknown,
}

impl DirectoryErrorKind {
    /// Stable label suitable for structured logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthFailure => "auth_failure",
            Self::NotFound => "not_found",
            Self::TransientNetwork => "transient_network",
            Self::PermanentRejection => "permanent_rejection",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for DirectoryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a directory client, carried back to callers inside a
/// `SyncResult`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct DirectoryError {
    pub kind: DirectoryErrorKind,
    pub message: String,
}

impl DirectoryError {
    pub fn new(kind: DirectoryErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::AuthFailure, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::NotFound, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::TransientNetwork, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::PermanentRejection, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(DirectoryErrorKind::Unknown, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == DirectoryErrorKind::NotFound
    }

    /// Whether redelivering the same event later may succeed.
    ///
    /// Advisory only: nothing in this workspace retries on its own.
    pub fn is_retryable(&self) -> bool {
        self.kind == DirectoryErrorKind::TransientNetwork
    }
}

impl From<DirectoryError> for ContactSyncError {
    fn from(err: DirectoryError) -> Self {
        match err.kind {
            DirectoryErrorKind::AuthFailure => Self::Auth(err.message),
            DirectoryErrorKind::NotFound => Self::NotFound(err.message),
            DirectoryErrorKind::TransientNetwork => Self::Network(err.message),
            DirectoryErrorKind::PermanentRejection => Self::InvalidInput(err.message),
            DirectoryErrorKind::Unknown => Self::Internal(err.message),
        }
    }
}
