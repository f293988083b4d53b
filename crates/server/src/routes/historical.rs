use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};
use utoipa::ToSchema;

use crate::{history::fetch_historical, routes::require_coordinates, AppState, Error, Series};

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoricalRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Inclusive range start, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Inclusive range end, `YYYY-MM-DD`
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoricalResponse {
    pub success: bool,
    pub historical: Series,
}

fn parse_date(raw: Option<&str>, field: &str) -> Result<Date, Error> {
    let raw = raw.ok_or_else(|| Error::validation(format!("{} is required", field)))?;
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw, format)
        .map_err(|e| Error::validation(format!("invalid {} '{}': {}", field, raw, e)))
}

#[utoipa::path(
    post,
    path = "/api/historical",
    request_body = HistoricalRequest,
    responses(
        (status = OK, description = "Hourly observations for the date range, truncated at the current hour", body = HistoricalResponse),
        (status = BAD_REQUEST, description = "Missing coordinates or malformed date range", body = crate::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Provider unreachable", body = crate::ErrorBody)
    ))]
pub async fn historical(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HistoricalRequest>,
) -> Result<Json<HistoricalResponse>, Error> {
    let coord = require_coordinates(request.latitude, request.longitude)?;
    let start = parse_date(request.start_date.as_deref(), "start_date")?;
    let end = parse_date(request.end_date.as_deref(), "end_date")?;

    let historical = fetch_historical(state.provider.as_ref(), coord, start, end).await?;
    Ok(Json(HistoricalResponse {
        success: true,
        historical,
    }))
}
