use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Catalog, SchemeRecord};
use super::eligibility::{matching_schemes, EligibilityQuery};

/// Optional list filters mirroring the dashboard search box and sector
/// dropdown.
#[derive(Debug, Default, Deserialize)]
struct SchemeListParams {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    sector: Option<String>,
}

/// Read-only catalog endpoints for the rendering collaborator.
pub fn catalog_router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/api/v1/schemes", get(list_handler))
        .route("/api/v1/schemes/match", post(match_handler))
        .route("/api/v1/schemes/:scheme_id", get(detail_handler))
        .with_state(catalog)
}

async fn list_handler(
    State(catalog): State<Arc<Catalog>>,
    Query(params): Query<SchemeListParams>,
) -> Json<serde_json::Value> {
    let sector = params.sector.unwrap_or_default();
    let needle = params.q.unwrap_or_default().to_lowercase();

    let schemes: Vec<&SchemeRecord> = catalog
        .in_sector(&sector)
        .into_iter()
        .filter(|record| needle.is_empty() || record.matches_term(&needle))
        .collect();

    Json(json!({
        "count": schemes.len(),
        "schemes": schemes,
    }))
}

async fn detail_handler(
    State(catalog): State<Arc<Catalog>>,
    Path(scheme_id): Path<String>,
) -> Response {
    match catalog.get(&scheme_id) {
        Some(record) => (StatusCode::OK, Json(json!(record))).into_response(),
        None => {
            let payload = json!({ "error": format!("no scheme with id {scheme_id}") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

async fn match_handler(
    State(catalog): State<Arc<Catalog>>,
    Json(query): Json<EligibilityQuery>,
) -> Json<serde_json::Value> {
    let schemes = matching_schemes(&query, catalog.records());
    Json(json!({
        "count": schemes.len(),
        "schemes": schemes,
    }))
}
