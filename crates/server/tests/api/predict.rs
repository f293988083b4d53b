use crate::helpers::{forecast_response, post_json, read_json, spawn_app, MockProvider};
use aero::Error;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn predict_returns_the_requested_hours() {
    let mut provider = MockProvider::new();
    provider
        .expect_current_and_forecast()
        .times(1)
        .returning(|_, _| Ok(forecast_response(18.0, vec![Some(18.0), Some(22.0), Some(26.0)])));
    let test_app = spawn_app(provider);

    let request = post_json(
        "/api/predict",
        json!({ "latitude": 38.9, "longitude": -77.04, "hours_ahead": 2 }),
    );
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], json!("open-meteo"));
    assert_eq!(body["location"]["latitude"], json!(38.9));
    assert_eq!(body["current_pm25"], json!(18.0));
    assert!(body["current_aqi"].is_number());

    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);
    assert_eq!(predictions[0]["pm25"], json!(22.0));
    assert_eq!(predictions[1]["pm25"], json!(26.0));
    assert_eq!(predictions[0]["is_historical"], json!(false));
}

#[tokio::test]
async fn predict_degrades_to_the_synthetic_fallback() {
    let mut provider = MockProvider::new();
    provider
        .expect_current_and_forecast()
        .times(1)
        .returning(|_, _| Err(Error::upstream("connection timed out")));
    let test_app = spawn_app(provider);

    let request = post_json("/api/predict", json!({ "latitude": 38.9, "longitude": -77.04 }));
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], json!("fallback"));
    assert_eq!(body["predictions"].as_array().unwrap().len(), 24);
    // The fallback has no current snapshot to report
    assert!(body.get("current_pm25").is_none());
}

#[tokio::test]
async fn predict_requires_coordinates() {
    let test_app = spawn_app(MockProvider::new());

    let request = post_json("/api/predict", json!({ "latitude": 38.9 }));
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("latitude and longitude are required"));
}

#[tokio::test]
async fn predict_rejects_out_of_range_hours_ahead() {
    let test_app = spawn_app(MockProvider::new());

    for hours in [0, 25, -3] {
        let request = post_json(
            "/api/predict",
            json!({ "latitude": 38.9, "longitude": -77.04, "hours_ahead": hours }),
        );
        let response = test_app.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
