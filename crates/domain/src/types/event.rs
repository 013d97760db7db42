//! Change events delivered by the host's trigger system

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entity::{ContactableEntity, EntityKind};
use crate::errors::ContactSyncError;

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Create,
    Modify,
    Delete,
}

impl SyncAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legacy trigger code such as `COMPANY_CREATE` or `CONTACT_DELETE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerCode {
    pub entity_kind: EntityKind,
    pub action: SyncAction,
}

impl FromStr for TriggerCode {
    type Err = ContactSyncError;

    /// Codes are case-sensitive. Surrounding whitespace, such as the newline
    /// left by a shell or an input file, is ignored.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let (entity_kind, action) = match code.trim() {
            "COMPANY_CREATE" => (EntityKind::Company, SyncAction::Create),
            "COMPANY_MODIFY" => (EntityKind::Company, SyncAction::Modify),
            "COMPANY_DELETE" => (EntityKind::Company, SyncAction::Delete),
            "CONTACT_CREATE" => (EntityKind::Person, SyncAction::Create),
            "CONTACT_MODIFY" => (EntityKind::Person, SyncAction::Modify),
            "CONTACT_DELETE" => (EntityKind::Person, SyncAction::Delete),
            other => {
                return Err(ContactSyncError::InvalidInput(format!(
                    "unsupported trigger code: {other}"
                )))
            }
        };
        Ok(Self { entity_kind, action })
    }
}

impl fmt::Display for TriggerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.entity_kind {
            EntityKind::Company => "COMPANY",
            EntityKind::Person => "CONTACT",
        };
        write!(f, "{prefix}_{}", self.action.as_str().to_ascii_uppercase())
    }
}

/// One create/modify/delete of a contactable entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub entity_kind: EntityKind,
    pub action: SyncAction,
    pub entity: ContactableEntity,
}

impl ChangeEvent {
    pub fn new(entity_kind: EntityKind, action: SyncAction, entity: ContactableEntity) -> Self {
        Self { entity_kind, action, entity }
    }

    /// Build an event from a legacy trigger code.
    ///
    /// # Errors
    /// Returns `ContactSyncError::InvalidInput` for codes that do not concern
    /// companies or contacts.
    pub fn from_trigger_code(code: &str, entity: ContactableEntity) -> crate::Result<Self> {
        let TriggerCode { entity_kind, action } = code.parse()?;
        Ok(Self::new(entity_kind, action, entity))
    }

    pub fn trigger_code(&self) -> TriggerCode {
        TriggerCode { entity_kind: self.entity_kind, action: self.action }
    }
}
