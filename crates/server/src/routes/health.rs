use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider_url: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Service is up", body = HealthResponse)
    ))]
pub async fn health(State(state): State<Arc<crate::AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider_url: state.provider_url.clone(),
    })
}
