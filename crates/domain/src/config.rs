//! Configuration management

use serde::{Deserialize, Serialize};

/// Default Google People API base URL
pub const DEFAULT_GOOGLE_API_BASE: &str = "https://people.googleapis.com/v1";

/// Default Google OAuth token endpoint
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub google: GoogleConfig,
}

/// Database configuration for the external reference store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "contactsync.db".to_string(), pool_size: default_pool_size() }
    }
}

/// Gating flags checked before any directory call is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Master switch for the contact sync module
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether companies and contacts are duplicated into the directory
    #[serde(default)]
    pub duplicate_into_contacts: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self { enabled: true, duplicate_into_contacts: false }
    }
}

impl SyncSettings {
    /// Both switches on.
    pub fn is_active(&self) -> bool {
        self.enabled && self.duplicate_into_contacts
    }
}

/// Google Contacts account and credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Account the contacts are written to (used for logging only)
    #[serde(default)]
    pub account: Option<String>,
    /// Pre-issued access token; takes precedence over the refresh flow
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,
    #[serde(default, skip_serializing)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            account: None,
            access_token: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            api_base: default_api_base(),
            token_url: default_token_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("account", &self.account)
            .field("access_token", &redacted(&self.access_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(&self.client_secret))
            .field("refresh_token", &redacted(&self.refresh_token))
            .field("api_base", &self.api_base)
            .field("token_url", &self.token_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn redacted(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "<redacted>")
}

impl GoogleConfig {
    /// True when a refresh-token exchange can be attempted.
    pub fn has_refresh_credentials(&self) -> bool {
        [&self.client_id, &self.client_secret, &self.refresh_token]
            .iter()
            .all(|value| value.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    /// Static access token, ignoring blank values.
    pub fn static_access_token(&self) -> Option<&str> {
        self.access_token.as_deref().map(str::trim).filter(|token| !token.is_empty())
    }
}

fn default_pool_size() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    DEFAULT_GOOGLE_API_BASE.to_string()
}

fn default_token_url() -> String {
    DEFAULT_GOOGLE_TOKEN_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}
