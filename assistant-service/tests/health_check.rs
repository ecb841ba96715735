//! Liveness, readiness and metrics endpoints.

mod common;

use assistant_service::services::extractor::mock::MockExtractor;
use assistant_service::services::providers::mock::MockTextProvider;
use assistant_service::services::weather::mock::MockWeatherProvider;
use common::{paris, TestApp};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_app() -> TestApp {
    TestApp::spawn_with(
        Arc::new(MockTextProvider::new()),
        Arc::new(MockWeatherProvider::returning(paris())),
        Arc::new(MockExtractor::returning("text")),
    )
    .await
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "assistant-service");
}

#[tokio::test]
async fn readiness_check_returns_ok() {
    let app = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn metrics_endpoint_serves_text() {
    let app = spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/metrics", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}
