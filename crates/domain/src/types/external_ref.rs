//! Provider-tagged external references
//!
//! A reference is persisted as `"<provider>:<id>"`, e.g. `"google:c123"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ContactSyncError;

const SEPARATOR: char = ':';

/// Link between a local entity and its remote directory record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalRef {
    provider: String,
    id: String,
}

impl ExternalRef {
    /// Build a reference from its parts. Both parts must be non-empty and the
    /// provider must not contain the separator.
    pub fn new(provider: impl Into<String>, id: impl Into<String>) -> crate::Result<Self> {
        let provider = provider.into();
        let id = id.into();

        if provider.trim().is_empty() || provider.contains(SEPARATOR) {
            return Err(ContactSyncError::InvalidInput(format!(
                "invalid external reference provider: {provider:?}"
            )));
        }
        if id.trim().is_empty() {
            return Err(ContactSyncError::InvalidInput(
                "external reference id must not be empty".into(),
            ));
        }

        Ok(Self { provider, id })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Provider-specific part, handed to the directory client.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Provider tags compare ASCII case-insensitively.
    pub fn belongs_to(&self, provider: &str) -> bool {
        self.provider.eq_ignore_ascii_case(provider)
    }
}

impl fmt::Display for ExternalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.provider, self.id)
    }
}

impl FromStr for ExternalRef {
    type Err = ContactSyncError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (provider, id) = raw.trim().split_once(SEPARATOR).ok_or_else(|| {
            ContactSyncError::InvalidInput(format!("external reference has no provider tag: {raw:?}"))
        })?;
        Self::new(provider, id)
    }
}

impl TryFrom<String> for ExternalRef {
    type Error = ContactSyncError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExternalRef> for String {
    fn from(value: ExternalRef) -> Self {
        value.to_string()
    }
}

/// How a raw persisted reference relates to a given provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefBinding {
    /// No reference (absent or blank)
    Unsynced,
    /// Reference produced by the provider in question
    Bound(ExternalRef),
    /// Reference owned by another provider, or unparseable
    Foreign,
}

impl RefBinding {
    /// Classify `raw` against `provider`.
    ///
    /// Malformed non-empty values are `Foreign` so they are never overwritten
    /// implicitly.
    pub fn classify(raw: Option<&str>, provider: &str) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::Unsynced;
        };

        match raw.parse::<ExternalRef>() {
            Ok(reference) if reference.belongs_to(provider) => Self::Bound(reference),
            _ => Self::Foreign,
        }
    }
}
