use crate::helpers::{full_day_response, post_json, read_json, spawn_app, MockProvider};
use aero::Error;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn series_fails_when_history_is_unavailable() {
    let mut provider = MockProvider::new();
    provider
        .expect_hourly_range()
        .times(1)
        .returning(|_, _, _| Err(Error::upstream("connection refused")));
    // The forecast leg still runs; its failure is recovered internally
    provider
        .expect_current_and_forecast()
        .times(1)
        .returning(|_, _| Err(Error::upstream("connection refused")));
    let test_app = spawn_app(provider);

    let request = post_json("/api/series", json!({ "latitude": 38.9, "longitude": -77.04 }));
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = read_json(response).await;
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn series_survives_a_failing_forecast_with_the_fallback() {
    let mut provider = MockProvider::new();
    provider
        .expect_hourly_range()
        .times(1)
        .returning(|_, _, _| Ok(full_day_response(20.0)));
    provider
        .expect_current_and_forecast()
        .times(1)
        .returning(|_, _| Err(Error::upstream("connection timed out")));
    let test_app = spawn_app(provider);

    let request = post_json(
        "/api/series",
        json!({ "latitude": 38.9, "longitude": -77.04, "start_date": "2020-01-01" }),
    );
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], json!("fallback"));

    // History survives in full and anchors the current sample
    let samples = body["series"].as_array().unwrap();
    assert!(samples.len() >= 24);
    assert_eq!(samples[0]["time"], json!("2020-01-01T00:00:00Z"));
    assert_eq!(body["current"]["is_historical"], json!(true));
    assert_eq!(body["current"]["pm25"], json!(20.0));
}

#[tokio::test]
async fn series_requires_coordinates() {
    let test_app = spawn_app(MockProvider::new());

    let request = post_json("/api/series", json!({ "longitude": -77.04 }));
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["error"], json!("latitude and longitude are required"));
}
