//! Credential handling for the Google Contacts directory

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use contactsync_core::{DirectoryClient, DirectoryConnector, DirectoryResult};
use contactsync_domain::{ContactSyncError, DirectoryError, GoogleConfig, Result};
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{debug, error};
use url::Url;

use super::client::GoogleContactsClient;
use super::types::TokenResponse;
use crate::http::HttpClient;

/// Refresh this long before the token endpoint says the token expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Builds authenticated [`GoogleContactsClient`]s from a [`GoogleConfig`].
///
/// A configured static access token is used as-is. Otherwise the refresh
/// token is exchanged at the token endpoint and the resulting access token
/// is cached until shortly before it expires.
pub struct GoogleContactsConnector {
    config: GoogleConfig,
    http: HttpClient,
    cached: Mutex<Option<CachedToken>>,
}

impl GoogleContactsConnector {
    /// Validate endpoints and build the shared HTTP client.
    pub fn new(config: GoogleConfig) -> Result<Self> {
        for (name, value) in [("api_base", &config.api_base), ("token_url", &config.token_url)] {
            Url::parse(value).map_err(|err| {
                ContactSyncError::Config(format!("invalid google {name} {value:?}: {err}"))
            })?;
        }

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self { config, http, cached: Mutex::new(None) })
    }

    fn account(&self) -> &str {
        self.config.account.as_deref().filter(|a| !a.trim().is_empty()).unwrap_or("<unnamed>")
    }

    fn login_failure(&self) -> DirectoryError {
        DirectoryError::auth(format!("Failed to login to Google for account {}", self.account()))
    }

    async fn access_token(&self) -> DirectoryResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.exchange_refresh_token().await?;
        let lifetime = token.expires_in.map_or(DEFAULT_TOKEN_LIFETIME, Duration::from_secs);
        let access_token = token.access_token;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + lifetime.saturating_sub(EXPIRY_MARGIN),
        });

        Ok(access_token)
    }

    async fn exchange_refresh_token(&self) -> DirectoryResult<TokenResponse> {
        let form = [
            ("client_id", self.config.client_id.as_deref().unwrap_or_default()),
            ("client_secret", self.config.client_secret.as_deref().unwrap_or_default()),
            ("refresh_token", self.config.refresh_token.as_deref().unwrap_or_default()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .send(self.http.request(Method::POST, &self.config.token_url).form(&form))
            .await
            .map_err(|err| {
                error!(account = self.account(), error = %err, "token request failed");
                self.login_failure()
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(account = self.account(), %status, "token endpoint rejected refresh token");
            return Err(self.login_failure());
        }

        let token: TokenResponse = response.json().await.map_err(|err| {
            error!(account = self.account(), error = %err, "failed to parse token response");
            self.login_failure()
        })?;

        if token.access_token.trim().is_empty() {
            error!(account = self.account(), "token endpoint returned an empty access token");
            return Err(self.login_failure());
        }

        debug!(account = self.account(), expires_in = ?token.expires_in, "refreshed google access token");
        Ok(token)
    }
}

#[async_trait]
impl DirectoryConnector for GoogleContactsConnector {
    async fn connect(&self) -> DirectoryResult<Option<Arc<dyn DirectoryClient>>> {
        let access_token = if let Some(token) = self.config.static_access_token() {
            token.to_string()
        } else if self.config.has_refresh_credentials() {
            self.access_token().await?
        } else {
            return Ok(None);
        };

        Ok(Some(Arc::new(GoogleContactsClient::new(
            self.http.clone(),
            &self.config.api_base,
            access_token,
        ))))
    }
}
