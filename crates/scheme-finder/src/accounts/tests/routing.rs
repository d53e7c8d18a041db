use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::MemoryStore;
use crate::accounts::router::auth_router;
use crate::accounts::service::SessionManager;
use crate::storage::{KeyValueStore, StorageError};

fn router_with<S: KeyValueStore + 'static>(storage: Arc<S>) -> (Router, Arc<SessionManager<S>>) {
    let session = Arc::new(SessionManager::open(storage).expect("session opens"));
    (auth_router(session.clone()), session)
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json payload")
}

fn register_payload(username: &str) -> Value {
    json!({
        "name": "Asha Rao",
        "email": format!("{username}@example.test"),
        "username": username,
        "password": "green-fields-7",
        "confirm_password": "green-fields-7",
        "business_type": "proprietorship",
    })
}

#[tokio::test]
async fn register_returns_created_with_a_sanitized_view() {
    let (router, _session) = router_with(Arc::new(MemoryStore::default()));

    let response = router
        .oneshot(post_json("/api/v1/auth/register", &register_payload("asha")))
        .await
        .expect("route resolves");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = body_json(response).await;
    assert_eq!(payload.get("username").and_then(Value::as_str), Some("asha"));
    assert!(payload.get("password_hash").is_none());
    assert!(payload.get("password").is_none());
}

#[tokio::test]
async fn register_maps_validation_errors_to_statuses() {
    let (router, _session) = router_with(Arc::new(MemoryStore::default()));

    let mut mismatched = register_payload("asha");
    mismatched["confirm_password"] = json!("other");
    let response = router
        .clone()
        .oneshot(post_json("/api/v1/auth/register", &mismatched))
        .await
        .expect("route resolves");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    router
        .clone()
        .oneshot(post_json("/api/v1/auth/register", &register_payload("asha")))
        .await
        .expect("route resolves");
    let response = router
        .oneshot(post_json("/api/v1/auth/register", &register_payload("asha")))
        .await
        .expect("route resolves");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_rejects_bad_credentials_with_unauthorized() {
    let (router, session) = router_with(Arc::new(MemoryStore::default()));
    session
        .register(super::common::registration("asha"))
        .expect("register succeeds");
    session.logout();

    let response = router
        .oneshot(post_json(
            "/api/v1/auth/login",
            &json!({ "username": "asha", "password": "wrong" }),
        ))
        .await
        .expect("route resolves");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let payload = body_json(response).await;
    assert_eq!(
        payload.get("error").and_then(Value::as_str),
        Some("invalid username or password")
    );
}

#[tokio::test]
async fn session_endpoint_reflects_login_and_logout() {
    let (router, _session) = router_with(Arc::new(MemoryStore::default()));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/session")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route resolves");
    let payload = body_json(response).await;
    assert_eq!(payload.get("authenticated"), Some(&json!(false)));

    router
        .clone()
        .oneshot(post_json("/api/v1/auth/register", &register_payload("asha")))
        .await
        .expect("route resolves");

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/session")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route resolves");
    let payload = body_json(response).await;
    assert_eq!(payload.get("authenticated"), Some(&json!(true)));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/logout")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route resolves");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/session")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route resolves");
    let payload = body_json(response).await;
    assert_eq!(payload.get("authenticated"), Some(&json!(false)));
}

#[tokio::test]
async fn storage_failure_maps_to_service_unavailable() {
    struct WriteFailsStore(MemoryStore);

    impl KeyValueStore for WriteFailsStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage went away".to_string()))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    let session = Arc::new(
        SessionManager::open(Arc::new(WriteFailsStore(MemoryStore::default())))
            .expect("session opens"),
    );
    let router = auth_router(session);

    let response = router
        .oneshot(post_json("/api/v1/auth/register", &register_payload("asha")))
        .await
        .expect("route resolves");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
