//! End-to-end runs of the contact sync trigger against a mocked People API
//! and a SQLite reference store.

mod support;

use std::sync::Arc;

use contactsync_core::{ContactSyncTrigger, ExternalRefStore};
use contactsync_domain::{
    ContactableEntity, DirectoryErrorKind, EntityKind, ExternalRef, GoogleConfig, LocalId,
    SyncSettings, SyncStatus,
};
use contactsync_infra::{GoogleContactsConnector, SqliteExternalRefStore};
use serde_json::json;
use support::{mount_create, TestDatabase};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACTIVE: SyncSettings = SyncSettings { enabled: true, duplicate_into_contacts: true };

struct Fixture {
    server: MockServer,
    _db: TestDatabase,
    store: Arc<SqliteExternalRefStore>,
    trigger: ContactSyncTrigger,
}

async fn fixture_with(google: impl FnOnce(&MockServer) -> GoogleConfig) -> Fixture {
    let server = MockServer::start().await;
    let db = TestDatabase::new();
    let store = Arc::new(db.store());
    let connector = GoogleContactsConnector::new(google(&server)).unwrap();
    let trigger = ContactSyncTrigger::new(ACTIVE, Arc::new(connector), store.clone());
    Fixture { server, _db: db, store, trigger }
}

async fn fixture() -> Fixture {
    fixture_with(|server| GoogleConfig {
        account: Some("ops@example.com".into()),
        access_token: Some("token".into()),
        api_base: format!("{}/v1", server.uri()),
        ..GoogleConfig::default()
    })
    .await
}

fn google(id: &str) -> ExternalRef {
    ExternalRef::new("google", id).unwrap()
}

#[tokio::test]
async fn company_lifecycle_create_modify_delete() {
    let f = fixture().await;
    mount_create(&f.server, "c1", 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/people/c1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "resourceName": "people/c1", "etag": "e1" })),
        )
        .expect(1)
        .mount(&f.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v1/people/c1:updateContact"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "resourceName": "people/c1", "etag": "e2" })),
        )
        .expect(1)
        .mount(&f.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/people/c1:deleteContact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&f.server)
        .await;

    let created =
        f.trigger.run_code("COMPANY_CREATE", ContactableEntity::new(1, "Acme Corp")).await.unwrap();
    assert_eq!(created.status, SyncStatus::Created);
    assert_eq!(f.store.load(EntityKind::Company, LocalId(1)).await.unwrap(), Some(google("c1")));

    let updated = f
        .trigger
        .run_code("COMPANY_MODIFY", ContactableEntity::new(1, "Acme Corporation"))
        .await
        .unwrap();
    assert_eq!(updated.status, SyncStatus::Updated);
    assert_eq!(updated.new_external_ref, Some(google("c1")));

    let deleted =
        f.trigger.run_code("COMPANY_DELETE", ContactableEntity::new(1, "Acme Corp")).await.unwrap();
    assert_eq!(deleted.status, SyncStatus::Deleted);
    assert_eq!(f.store.load(EntityKind::Company, LocalId(1)).await.unwrap(), None);
}

#[tokio::test]
async fn remotely_deleted_contact_is_recreated_once() {
    let f = fixture().await;
    f.store.save(EntityKind::Person, LocalId(4), &google("stale")).await.unwrap();
    Mock::given(method("GET"))
        .and(path("/v1/people/stale"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&f.server)
        .await;
    mount_create(&f.server, "fresh", 1).await;

    let result =
        f.trigger.run_code("CONTACT_MODIFY", ContactableEntity::new(4, "Jane Doe")).await.unwrap();

    assert_eq!(result.status, SyncStatus::Created);
    assert_eq!(f.store.load(EntityKind::Person, LocalId(4)).await.unwrap(), Some(google("fresh")));
}

#[tokio::test]
async fn foreign_reference_is_left_alone() {
    let f = fixture().await;

    let entity = ContactableEntity::new(2, "Globex").with_external_ref("yahoo:xyz");
    let result = f.trigger.run_code("COMPANY_MODIFY", entity).await.unwrap();

    assert_eq!(result.status, SyncStatus::Skipped);
    assert!(f.server.received_requests().await.unwrap().is_empty());
    assert_eq!(f.store.load(EntityKind::Company, LocalId(2)).await.unwrap(), None);
}

#[tokio::test]
async fn expired_token_fails_without_touching_the_store() {
    let f = fixture().await;
    f.store.save(EntityKind::Company, LocalId(3), &google("c3")).await.unwrap();
    Mock::given(method("DELETE"))
        .and(path("/v1/people/c3:deleteContact"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&f.server)
        .await;

    let result =
        f.trigger.run_code("COMPANY_DELETE", ContactableEntity::new(3, "Initech")).await.unwrap();

    assert_eq!(result.status, SyncStatus::Failed);
    assert_eq!(result.error.map(|e| e.kind), Some(DirectoryErrorKind::AuthFailure));
    assert_eq!(f.store.load(EntityKind::Company, LocalId(3)).await.unwrap(), Some(google("c3")));
}

#[tokio::test]
async fn refresh_credentials_are_exchanged_before_calls() {
    let f = fixture_with(|server| GoogleConfig {
        account: Some("ops@example.com".into()),
        client_id: Some("client".into()),
        client_secret: Some("secret".into()),
        refresh_token: Some("refresh".into()),
        api_base: format!("{}/v1", server.uri()),
        token_url: format!("{}/token", server.uri()),
        ..GoogleConfig::default()
    })
    .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "fresh", "expires_in": 3600 })),
        )
        .expect(1)
        .mount(&f.server)
        .await;
    mount_create(&f.server, "p1", 2).await;

    for id in [1_i64, 2] {
        let result = f
            .trigger
            .run_code("CONTACT_CREATE", ContactableEntity::new(id, format!("Person {id}")))
            .await
            .unwrap();
        assert_eq!(result.status, SyncStatus::Created);
    }
}

#[tokio::test]
async fn missing_credentials_skip_without_requests() {
    let f = fixture_with(|server| GoogleConfig {
        api_base: format!("{}/v1", server.uri()),
        ..GoogleConfig::default()
    })
    .await;

    let result =
        f.trigger.run_code("CONTACT_CREATE", ContactableEntity::new(9, "John")).await.unwrap();

    assert_eq!(result.status, SyncStatus::Skipped);
    assert!(f.server.received_requests().await.unwrap().is_empty());
}
