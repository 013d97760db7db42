//! Conversions from external infrastructure errors into domain errors.

use contactsync_domain::{ContactSyncError, DirectoryError, DirectoryErrorKind};
use reqwest::{Error as HttpError, StatusCode};
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ContactSyncError);

impl From<InfraError> for ContactSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ContactSyncError> for InfraError {
    fn from(value: ContactSyncError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoContactSyncError {
    fn into_contactsync(self) -> ContactSyncError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → ContactSyncError */
/* -------------------------------------------------------------------------- */

impl IntoContactSyncError for SqlError {
    fn into_contactsync(self) -> ContactSyncError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        ContactSyncError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        ContactSyncError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        ContactSyncError::Database("unique constraint violation".into())
                    }
                    _ => ContactSyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                ContactSyncError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                ContactSyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                ContactSyncError::Database(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => ContactSyncError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => ContactSyncError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_contactsync())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → ContactSyncError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(ContactSyncError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ContactSyncError */
/* -------------------------------------------------------------------------- */

impl IntoContactSyncError for HttpError {
    fn into_contactsync(self) -> ContactSyncError {
        if self.is_timeout() {
            return ContactSyncError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ContactSyncError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let message = status_message(status);

            return match status.as_u16() {
                401 | 403 => ContactSyncError::Auth(message),
                404 => ContactSyncError::NotFound(message),
                429 => ContactSyncError::Network(message),
                400..=499 => ContactSyncError::InvalidInput(message),
                _ => ContactSyncError::Network(message),
            };
        }

        ContactSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_contactsync())
    }
}

/* -------------------------------------------------------------------------- */
/* HTTP → DirectoryError */
/* -------------------------------------------------------------------------- */

/// Classify a non-success HTTP status returned by a directory provider.
pub fn directory_error_kind(status: StatusCode) -> DirectoryErrorKind {
    match status.as_u16() {
        401 | 403 => DirectoryErrorKind::AuthFailure,
        404 | 410 => DirectoryErrorKind::NotFound,
        408 | 429 | 500..=599 => DirectoryErrorKind::TransientNetwork,
        400..=499 => DirectoryErrorKind::PermanentRejection,
        _ => DirectoryErrorKind::Unknown,
    }
}

/// Build a directory error from a non-success response status and body.
pub fn directory_error_from_status(status: StatusCode, body: &str) -> DirectoryError {
    let body = body.trim();
    let message = if body.is_empty() {
        status_message(status)
    } else {
        format!("{}: {body}", status_message(status))
    };
    DirectoryError::new(directory_error_kind(status), message)
}

/// Map an application error from the shared HTTP client into the directory
/// taxonomy.
pub fn directory_error_from_app(err: ContactSyncError) -> DirectoryError {
    match err {
        ContactSyncError::Auth(message) => DirectoryError::auth(message),
        ContactSyncError::NotFound(message) => DirectoryError::not_found(message),
        ContactSyncError::Network(message) => DirectoryError::transient(message),
        ContactSyncError::InvalidInput(message) => DirectoryError::rejected(message),
        other => DirectoryError::unknown(other.to_string()),
    }
}

fn status_message(status: StatusCode) -> String {
    format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status"))
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
