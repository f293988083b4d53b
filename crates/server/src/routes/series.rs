use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date};
use utoipa::ToSchema;

use crate::{
    forecast::ForecastSource, routes::require_coordinates, series::get_series, AppState, Error,
    Sample, Series,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SeriesRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Optional history window start, `YYYY-MM-DD`. Defaults to today.
    pub start_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesResponse {
    pub success: bool,
    pub source: ForecastSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Sample>,
    pub series: Series,
}

#[utoipa::path(
    post,
    path = "/api/series",
    request_body = SeriesRequest,
    responses(
        (status = OK, description = "History so far today stitched to the next 24 forecast hours", body = SeriesResponse),
        (status = BAD_REQUEST, description = "Missing or out-of-range coordinates", body = crate::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Provider unreachable for history", body = crate::ErrorBody)
    ))]
pub async fn series(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeriesRequest>,
) -> Result<Json<SeriesResponse>, Error> {
    let coord = require_coordinates(request.latitude, request.longitude)?;
    let window_start = match request.start_date.as_deref() {
        Some(raw) => {
            let format = format_description!("[year]-[month]-[day]");
            Some(Date::parse(raw, format).map_err(|e| {
                Error::validation(format!("invalid start_date '{}': {}", raw, e))
            })?)
        }
        None => None,
    };

    let snapshot = get_series(state.provider.as_ref(), coord, window_start).await?;
    Ok(Json(SeriesResponse {
        success: true,
        source: snapshot.source,
        current: snapshot.current,
        series: snapshot.series,
    }))
}
