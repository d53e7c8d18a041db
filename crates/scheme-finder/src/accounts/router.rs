use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::RegistrationRequest;
use super::service::{AuthError, SessionManager};
use crate::storage::KeyValueStore;

/// Login form payload. `remember` mirrors the intake form's checkbox and
/// controls whether the refreshed last-login reaches the account collection.
#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
    #[serde(default)]
    remember: bool,
}

/// Session and registration endpoints for the navigation collaborator.
pub fn auth_router<S>(session: Arc<SessionManager<S>>) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<S>))
        .route("/api/v1/auth/login", post(login_handler::<S>))
        .route("/api/v1/auth/logout", post(logout_handler::<S>))
        .route("/api/v1/auth/session", get(session_handler::<S>))
        .with_state(session)
}

async fn register_handler<S>(
    State(session): State<Arc<SessionManager<S>>>,
    Json(request): Json<RegistrationRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match session.register(request) {
        Ok(account) => (StatusCode::CREATED, Json(json!(account.public_view()))).into_response(),
        Err(err) => auth_error_response(err),
    }
}

async fn login_handler<S>(
    State(session): State<Arc<SessionManager<S>>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match session.login(&request.username, &request.password, request.remember) {
        Ok(account) => (StatusCode::OK, Json(json!(account.public_view()))).into_response(),
        Err(err) => auth_error_response(err),
    }
}

async fn logout_handler<S>(State(session): State<Arc<SessionManager<S>>>) -> Response
where
    S: KeyValueStore + 'static,
{
    session.logout();
    StatusCode::NO_CONTENT.into_response()
}

async fn session_handler<S>(State(session): State<Arc<SessionManager<S>>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let account = session.current_identity();
    let payload = json!({
        "authenticated": account.is_some(),
        "account": account.map(|account| account.public_view()),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

fn auth_error_response(err: AuthError) -> Response {
    let status = match err {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::UsernameTaken => StatusCode::CONFLICT,
        AuthError::PasswordMismatch => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
