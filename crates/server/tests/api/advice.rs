use crate::helpers::{forecast_response, post_json, read_json, spawn_app, MockProvider};
use aero::Error;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn advice_serves_the_canned_default_without_a_backend() {
    let mut provider = MockProvider::new();
    provider
        .expect_current_and_forecast()
        .times(1)
        .returning(|_, _| Ok(forecast_response(8.0, vec![Some(8.0), Some(9.0)])));
    let test_app = spawn_app(provider);

    let request = post_json("/api/advice", json!({ "latitude": 38.9, "longitude": -77.04 }));
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["source"], json!("fallback"));
    assert_eq!(body["advice"]["urgency"], json!("medium"));
    // pm2.5 of 8 is Good air, so going outside stays allowed
    assert_eq!(body["advice"]["shouldGoOutside"], json!(true));
    assert!(body["advice"]["recommendations"].as_array().unwrap().len() >= 1);
}

#[tokio::test]
async fn advice_still_answers_when_the_provider_is_down() {
    let mut provider = MockProvider::new();
    provider
        .expect_current_and_forecast()
        .times(1)
        .returning(|_, _| Err(Error::upstream("connection timed out")));
    let test_app = spawn_app(provider);

    let request = post_json("/api/advice", json!({ "latitude": 38.9, "longitude": -77.04 }));
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["source"], json!("fallback"));
}

#[tokio::test]
async fn advice_requires_coordinates() {
    let test_app = spawn_app(MockProvider::new());

    let request = post_json("/api/advice", json!({}));
    let response = test_app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
