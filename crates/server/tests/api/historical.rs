use crate::helpers::{full_day_response, post_json, read_json, spawn_app, MockProvider};
use aero::Error;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn historical_returns_hourly_samples_with_derived_aqi() {
    let mut provider = MockProvider::new();
    provider
        .expect_hourly_range()
        .times(1)
        .returning(|_, _, _| Ok(full_day_response(20.0)));
    let test_app = spawn_app(provider);

    let request = post_json(
        "/api/historical",
        json!({
            "latitude": 38.9,
            "longitude": -77.04,
            "start_date": "2020-01-01",
            "end_date": "2020-01-01"
        }),
    );
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], json!(true));

    let samples = body["historical"].as_array().unwrap();
    assert_eq!(samples.len(), 24);
    for sample in samples {
        assert_eq!(sample["pm25"], json!(20.0));
        assert_eq!(sample["aqi"], json!(68));
        assert_eq!(sample["is_historical"], json!(true));
    }
    assert_eq!(samples[0]["time"], json!("2020-01-01T00:00:00Z"));
}

#[tokio::test]
async fn historical_requires_coordinates() {
    let test_app = spawn_app(MockProvider::new());

    let request = post_json(
        "/api/historical",
        json!({ "start_date": "2020-01-01", "end_date": "2020-01-02" }),
    );
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["error"], json!("latitude and longitude are required"));
}

#[tokio::test]
async fn historical_rejects_an_inverted_date_range() {
    // The provider must never be called; no expectations are set
    let test_app = spawn_app(MockProvider::new());

    let request = post_json(
        "/api/historical",
        json!({
            "latitude": 38.9,
            "longitude": -77.04,
            "start_date": "2020-01-02",
            "end_date": "2020-01-01"
        }),
    );
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn historical_rejects_malformed_dates() {
    let test_app = spawn_app(MockProvider::new());

    let request = post_json(
        "/api/historical",
        json!({
            "latitude": 38.9,
            "longitude": -77.04,
            "start_date": "01/02/2020",
            "end_date": "2020-01-03"
        }),
    );
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn historical_surfaces_upstream_failures_as_500() {
    let mut provider = MockProvider::new();
    provider
        .expect_hourly_range()
        .times(1)
        .returning(|_, _, _| Err(Error::upstream("connection refused")));
    let test_app = spawn_app(provider);

    let request = post_json(
        "/api/historical",
        json!({
            "latitude": 38.9,
            "longitude": -77.04,
            "start_date": "2020-01-01",
            "end_date": "2020-01-01"
        }),
    );
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = read_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("upstream"));
}
