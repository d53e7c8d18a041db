use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;

use scheme_finder::accounts::{auth_router, SessionManager};
use scheme_finder::alerts::AlertSubscriptions;
use scheme_finder::catalog::{catalog_router, Catalog};
use scheme_finder::storage::KeyValueStore;

use crate::infra::AppState;

#[derive(Debug, Deserialize)]
pub(crate) struct SubscribeRequest {
    pub(crate) email: String,
}

/// Compose the full application surface: operational endpoints plus the
/// catalog and auth routers from the core library.
pub(crate) fn with_app_routes<S>(
    catalog: Arc<Catalog>,
    session: Arc<SessionManager<S>>,
    alerts: Arc<AlertSubscriptions<S>>,
) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/alerts/subscribe", post(subscribe_handler::<S>))
        .with_state(alerts)
        .merge(catalog_router(catalog))
        .merge(auth_router(session))
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn subscribe_handler<S>(
    State(alerts): State<Arc<AlertSubscriptions<S>>>,
    Json(request): Json<SubscribeRequest>,
) -> impl IntoResponse
where
    S: KeyValueStore + 'static,
{
    match alerts.subscribe(&request.email) {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(json!({ "status": "subscribed", "email": request.email })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": err.to_string() })),
        ),
    }
}
