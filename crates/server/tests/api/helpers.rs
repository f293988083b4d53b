use std::sync::Arc;

use aero::{
    app, AirQualityProvider, AppState, Coordinate, CurrentBlock, Error, HourlyBlock,
    HourlyResponse,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use mockall::mock;
use serde_json::Value;
use time::Date;

mock! {
    pub Provider {}

    #[async_trait]
    impl AirQualityProvider for Provider {
        async fn hourly_range(
            &self,
            coord: Coordinate,
            start: Date,
            end: Date,
        ) -> Result<HourlyResponse, Error>;

        async fn current_and_forecast(
            &self,
            coord: Coordinate,
            hours: u8,
        ) -> Result<HourlyResponse, Error>;
    }
}

pub struct TestApp {
    pub app: Router,
}

pub fn spawn_app(provider: MockProvider) -> TestApp {
    let state = AppState {
        provider_url: "http://provider.test/v1/air-quality".to_string(),
        provider: Arc::new(provider),
        text_generation: None,
    };
    TestApp { app: app(state) }
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// A full past day of hourly readings at a constant pm2.5 level
pub fn full_day_response(pm25: f64) -> HourlyResponse {
    HourlyResponse {
        utc_offset_seconds: 0,
        hourly: HourlyBlock {
            time: (0..24).map(|h| format!("2020-01-01T{:02}:00", h)).collect(),
            pm2_5: vec![Some(pm25); 24],
            ..Default::default()
        },
        current: None,
    }
}

/// A forecast-shaped response: current snapshot plus a handful of hourly
/// values the service indexes by hour offset
pub fn forecast_response(current_pm25: f64, hourly_pm25: Vec<Option<f64>>) -> HourlyResponse {
    HourlyResponse {
        utc_offset_seconds: 0,
        hourly: HourlyBlock {
            time: (0..hourly_pm25.len())
                .map(|h| format!("2020-01-01T{:02}:00", h))
                .collect(),
            pm2_5: hourly_pm25,
            ..Default::default()
        },
        current: Some(CurrentBlock {
            time: Some("2020-01-01T00:00".to_string()),
            pm2_5: Some(current_pm25),
            ..Default::default()
        }),
    }
}
