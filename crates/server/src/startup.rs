use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    advice::{HttpTextGeneration, TextGeneration},
    provider::{AirQualityProvider, OpenMeteo},
    routes, Cli,
};

#[derive(Clone)]
pub struct AppState {
    pub provider_url: String,
    pub provider: Arc<dyn AirQualityProvider>,
    pub text_generation: Option<Arc<dyn TextGeneration>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::predict::predict,
        routes::historical::historical,
        routes::series::series,
        routes::advice::advice,
        routes::health::health,
    ),
    components(
        schemas(
                crate::models::Sample,
                crate::models::Series,
                crate::aqi::AqiCategory,
                crate::forecast::ForecastSource,
                crate::advice::Advice,
                crate::advice::Recommendation,
                crate::error::ErrorBody,
                routes::predict::PredictRequest,
                routes::predict::PredictResponse,
                routes::predict::Location,
                routes::historical::HistoricalRequest,
                routes::historical::HistoricalResponse,
                routes::series::SeriesRequest,
                routes::series::SeriesResponse,
                routes::advice::AdviceRequest,
                routes::advice::AdviceResponse,
                routes::health::HealthResponse
            )
    ),
    tags(
        (name = "aero api", description = "a RESTful api for hourly air-quality history, forecasts and health advice")
    )
)]
struct ApiDoc;

pub fn build_app_state(cli: &Cli) -> AppState {
    let provider_url = cli.provider_url();
    let provider = Arc::new(OpenMeteo::new(
        provider_url.clone(),
        Duration::from_secs(cli.forecast_timeout_secs()),
        Duration::from_secs(cli.historical_timeout_secs()),
    ));
    let text_generation = cli
        .advice_url
        .clone()
        .map(|url| Arc::new(HttpTextGeneration::new(url)) as Arc<dyn TextGeneration>);

    AppState {
        provider_url,
        provider,
        text_generation,
    }
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/api/predict", post(routes::predict))
        .route("/api/historical", post(routes::historical))
        .route("/api/series", post(routes::series))
        .route("/api/advice", post(routes::advice))
        .route("/health", get(routes::health))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
