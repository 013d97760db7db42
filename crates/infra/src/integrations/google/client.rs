//! People API implementation of `DirectoryClient`

use async_trait::async_trait;
use contactsync_core::{DirectoryClient, DirectoryResult};
use contactsync_domain::{ContactableEntity, DirectoryError, EntityKind};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{PersonPayload, PersonResource, UPDATE_PERSON_FIELDS};
use super::GOOGLE_PROVIDER;
use crate::errors::{directory_error_from_app, directory_error_from_status};
use crate::http::HttpClient;

/// Authenticated client for one Google account.
#[derive(Clone)]
pub struct GoogleContactsClient {
    http: HttpClient,
    api_base: String,
    access_token: String,
}

impl std::fmt::Debug for GoogleContactsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleContactsClient").field("api_base", &self.api_base).finish_non_exhaustive()
    }
}

impl GoogleContactsClient {
    pub fn new(http: HttpClient, api_base: &str, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn person_url(&self, id: &str, suffix: &str) -> DirectoryResult<String> {
        let id = id.strip_prefix("people/").unwrap_or(id);
        if id.is_empty() || id.contains(['/', '?', '#', ':']) {
            return Err(DirectoryError::rejected(format!("invalid contact id {id:?}")));
        }
        Ok(format!("{}/people/{id}{suffix}", self.api_base))
    }

    async fn execute(&self, builder: reqwest::RequestBuilder) -> DirectoryResult<Response> {
        let response = self
            .http
            .send(builder.bearer_auth(&self.access_token))
            .await
            .map_err(directory_error_from_app)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(directory_error_from_status(status, &body))
    }

    async fn fetch_etag(&self, id: &str) -> DirectoryResult<Option<String>> {
        let url = self.person_url(id, "")?;
        let response = self
            .execute(self.http.request(Method::GET, url).query(&[("personFields", "metadata")]))
            .await?;
        let person: PersonResource = parse_json(response).await?;
        Ok(person.etag)
    }
}

#[async_trait]
impl DirectoryClient for GoogleContactsClient {
    fn provider(&self) -> &str {
        GOOGLE_PROVIDER
    }

    async fn create_contact(
        &self,
        kind: EntityKind,
        entity: &ContactableEntity,
    ) -> DirectoryResult<String> {
        let url = format!("{}/people:createContact", self.api_base);
        let payload = PersonPayload::from_entity(kind, entity);

        let response = self.execute(self.http.request(Method::POST, url).json(&payload)).await?;
        let person: PersonResource = parse_json(response).await?;

        let id = person.contact_id().ok_or_else(|| {
            DirectoryError::unknown(format!(
                "create returned an unusable resource name {:?}",
                person.resource_name
            ))
        })?;

        debug!(%kind, local_id = %entity.local_id, contact_id = id, "created google contact");
        Ok(id.to_string())
    }

    async fn update_contact(
        &self,
        id: &str,
        kind: EntityKind,
        entity: &ContactableEntity,
    ) -> DirectoryResult<()> {
        let etag = self.fetch_etag(id).await?;
        let url = self.person_url(id, ":updateContact")?;
        let payload = PersonPayload::from_entity(kind, entity).with_etag(etag);

        self.execute(
            self.http
                .request(Method::PATCH, url)
                .query(&[("updatePersonFields", UPDATE_PERSON_FIELDS)])
                .json(&payload),
        )
        .await?;

        debug!(%kind, local_id = %entity.local_id, contact_id = id, "updated google contact");
        Ok(())
    }

    async fn delete_contact_by_ref(&self, id: &str) -> DirectoryResult<()> {
        let url = self.person_url(id, ":deleteContact")?;
        self.execute(self.http.request(Method::DELETE, url)).await?;

        debug!(contact_id = id, "deleted google contact");
        Ok(())
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> DirectoryResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|err| DirectoryError::unknown(format!("failed to parse People API response: {err}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use contactsync_domain::DirectoryErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> GoogleContactsClient {
        let http = HttpClient::builder()
            .base_backoff(Duration::from_millis(1))
            .build()
            .expect("http client");
        GoogleContactsClient::new(http, &format!("{}/v1/", server.uri()), "token-123")
    }

    #[tokio::test]
    async fn create_posts_person_and_strips_resource_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/people:createContact"))
            .and(header("authorization", "Bearer token-123"))
            .and(body_partial_json(json!({
                "names": [{ "unstructuredName": "Acme Corp" }],
                "organizations": [{ "name": "Acme Corp" }],
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "resourceName": "people/c101", "etag": "e1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let id = client(&server)
            .create_contact(EntityKind::Company, &ContactableEntity::new(1, "Acme Corp"))
            .await
            .unwrap();

        assert_eq!(id, "c101");
    }

    #[tokio::test]
    async fn create_is_not_retried_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/people:createContact"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .create_contact(EntityKind::Person, &ContactableEntity::new(2, "Jane"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, DirectoryErrorKind::TransientNetwork);
    }

    #[tokio::test]
    async fn update_sends_current_etag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/people/c7"))
            .and(query_param("personFields", "metadata"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "resourceName": "people/c7", "etag": "etag-7" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/v1/people/c7:updateContact"))
            .and(query_param("updatePersonFields", UPDATE_PERSON_FIELDS))
            .and(body_partial_json(json!({
                "etag": "etag-7",
                "names": [{ "unstructuredName": "Jane Doe" }],
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "resourceName": "people/c7", "etag": "etag-8" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .update_contact("c7", EntityKind::Person, &ContactableEntity::new(5, "Jane Doe"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_of_missing_contact_reports_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/people/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Requested entity was not found."))
            .mount(&server)
            .await;

        let err = client(&server)
            .update_contact("gone", EntityKind::Company, &ContactableEntity::new(1, "Acme"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.message.contains("not found"));
    }

    #[tokio::test]
    async fn delete_maps_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/people/c9:deleteContact"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).delete_contact_by_ref("c9").await.unwrap_err();

        assert_eq!(err.kind, DirectoryErrorKind::AuthFailure);
    }

    #[tokio::test]
    async fn unparseable_response_is_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .create_contact(EntityKind::Person, &ContactableEntity::new(3, "John"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, DirectoryErrorKind::Unknown);
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_without_request() {
        let server = MockServer::start().await;

        let err = client(&server).delete_contact_by_ref("../people").await.unwrap_err();

        assert_eq!(err.kind, DirectoryErrorKind::PermanentRejection);
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
