//! People API wire types

use contactsync_domain::{ContactableEntity, EntityKind};
use serde::{Deserialize, Serialize};

/// Fields written on update; anything absent from the payload is cleared.
pub const UPDATE_PERSON_FIELDS: &str = "names,emailAddresses,phoneNumbers,organizations";

/// Contact body sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub names: Vec<PersonName>,
    pub email_addresses: Vec<ValueField>,
    pub phone_numbers: Vec<ValueField>,
    pub organizations: Vec<Organization>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub unstructured_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueField {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub name: String,
}

impl PersonPayload {
    /// Build the payload for an entity. Companies also carry an organization
    /// entry so they show up as businesses in the address book.
    pub fn from_entity(kind: EntityKind, entity: &ContactableEntity) -> Self {
        let name = entity.trimmed_name().to_string();
        let organizations = match kind {
            EntityKind::Company if !name.is_empty() => vec![Organization { name: name.clone() }],
            _ => Vec::new(),
        };

        Self {
            etag: None,
            names: if name.is_empty() {
                Vec::new()
            } else {
                vec![PersonName { unstructured_name: name }]
            },
            email_addresses: value_fields(entity.email.as_deref()),
            phone_numbers: value_fields(entity.phone.as_deref()),
            organizations,
        }
    }

    pub fn with_etag(mut self, etag: Option<String>) -> Self {
        self.etag = etag;
        self
    }
}

fn value_fields(value: Option<&str>) -> Vec<ValueField> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| vec![ValueField { value: v.to_string() }])
        .unwrap_or_default()
}

/// Subset of a `Person` resource returned by the API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResource {
    pub resource_name: String,
    #[serde(default)]
    pub etag: Option<String>,
}

impl PersonResource {
    /// Id part of `people/<id>`
    pub fn contact_id(&self) -> Option<&str> {
        let id = self.resource_name.strip_prefix("people/").unwrap_or(&self.resource_name);
        (!id.trim().is_empty()).then_some(id)
    }
}

/// OAuth token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
