//! Outcome of a single sync invocation

use serde::{Deserialize, Serialize};

use super::external_ref::ExternalRef;
use crate::errors::DirectoryError;

/// Status reported back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Created,
    Updated,
    Deleted,
    Skipped,
    Failed,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Result of handling one `ChangeEvent`.
///
/// The caller commits `new_external_ref` after `Created`/`Updated` and clears
/// the stored reference after `Deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub status: SyncStatus,
    pub new_external_ref: Option<ExternalRef>,
    pub error: Option<DirectoryError>,
}

impl SyncResult {
    pub fn created(reference: ExternalRef) -> Self {
        Self { status: SyncStatus::Created, new_external_ref: Some(reference), error: None }
    }

    pub fn updated(reference: ExternalRef) -> Self {
        Self { status: SyncStatus::Updated, new_external_ref: Some(reference), error: None }
    }

    pub fn deleted() -> Self {
        Self { status: SyncStatus::Deleted, new_external_ref: None, error: None }
    }

    pub fn skipped() -> Self {
        Self { status: SyncStatus::Skipped, new_external_ref: None, error: None }
    }

    pub fn failed(error: DirectoryError) -> Self {
        Self { status: SyncStatus::Failed, new_external_ref: None, error: Some(error) }
    }

    pub fn is_failure(&self) -> bool {
        self.status == SyncStatus::Failed
    }
}
