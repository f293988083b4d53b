use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    advice::{generate_advice, Advice},
    forecast::fetch_forecast,
    routes::require_coordinates,
    AppState, Error,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdviceRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdviceResponse {
    pub success: bool,
    /// "model" when the text backend produced the advice, "fallback" for
    /// the canned default
    pub source: String,
    pub advice: Advice,
}

#[utoipa::path(
    post,
    path = "/api/advice",
    request_body = AdviceRequest,
    responses(
        (status = OK, description = "Health guidance for current conditions, canned fallback when no backend is usable", body = AdviceResponse),
        (status = BAD_REQUEST, description = "Missing or out-of-range coordinates", body = crate::ErrorBody)
    ))]
pub async fn advice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdviceRequest>,
) -> Result<Json<AdviceResponse>, Error> {
    let coord = require_coordinates(request.latitude, request.longitude)?;

    // One forecast hour is enough to anchor the advice on current conditions
    let forecast = fetch_forecast(state.provider.as_ref(), coord, 1).await?;
    let conditions = forecast
        .current
        .as_ref()
        .or_else(|| forecast.series.first())
        .ok_or_else(|| Error::upstream("no current conditions available"))?;

    let backend = state.text_generation.as_deref();
    let outcome = generate_advice(backend, conditions).await;

    Ok(Json(AdviceResponse {
        success: true,
        source: if outcome.fallback {
            "fallback".to_string()
        } else {
            "model".to_string()
        },
        advice: outcome.advice,
    }))
}
