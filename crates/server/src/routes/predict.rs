use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    forecast::{fetch_forecast, ForecastSource},
    routes::require_coordinates,
    AppState, Error, Series,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PredictRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// How many hours to predict, 1 to 24. Defaults to 24.
    pub hours_ahead: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    pub success: bool,
    pub source: ForecastSource,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_pm25: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_aqi: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_o3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_no2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_co: Option<f64>,
    pub predictions: Series,
}

#[utoipa::path(
    post,
    path = "/api/predict",
    request_body = PredictRequest,
    responses(
        (status = OK, description = "Hourly forecast, synthetic fallback when the provider is down", body = PredictResponse),
        (status = BAD_REQUEST, description = "Missing or out-of-range coordinates or hours_ahead", body = crate::ErrorBody)
    ))]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, Error> {
    let coord = require_coordinates(request.latitude, request.longitude)?;
    let hours_ahead = request.hours_ahead.unwrap_or(24);
    if !(1..=24).contains(&hours_ahead) {
        return Err(Error::validation(format!(
            "hours_ahead must be between 1 and 24, got {}",
            hours_ahead
        )));
    }

    let forecast = fetch_forecast(state.provider.as_ref(), coord, hours_ahead as u8).await?;
    let current = forecast.current.as_ref();

    Ok(Json(PredictResponse {
        success: true,
        source: forecast.source,
        location: Location {
            latitude: coord.latitude,
            longitude: coord.longitude,
        },
        current_pm25: current.map(|s| s.pm25),
        current_aqi: current.map(|s| s.aqi),
        current_o3: current.map(|s| s.ozone),
        current_no2: current.map(|s| s.nitrogen_dioxide),
        current_co: current.map(|s| s.carbon_monoxide),
        predictions: forecast.series,
    }))
}
