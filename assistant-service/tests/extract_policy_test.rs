mod common;

use assistant_service::services::extractor::mock::MockExtractor;
use assistant_service::services::providers::mock::{MockReply, MockTextProvider};
use assistant_service::services::weather::mock::MockWeatherProvider;
use common::{paris, TestApp};
use reqwest::multipart;
use reqwest::StatusCode;
use std::sync::Arc;

fn policy_file() -> multipart::Part {
    multipart::Part::bytes(b"%PDF-1.7 policy".to_vec())
        .file_name("policy.pdf")
        .mime_str("application/pdf")
        .unwrap()
}

async fn post_form(app: &TestApp, form: multipart::Form) -> (StatusCode, serde_json::Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/extractPolicy", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request.");

    let status = response.status();
    let body = response.json().await.expect("Failed to parse JSON");
    (status, body)
}

#[tokio::test]
async fn answers_question_about_uploaded_document() {
    let model = Arc::new(MockTextProvider::with_replies([
        "Coverage limit is $50,000.",
    ]));
    let extractor = Arc::new(MockExtractor::returning(
        "Policy 12\nCoverage limit: $50,000\nDeductible: $250",
    ));
    let app = TestApp::spawn_with(
        model.clone(),
        Arc::new(MockWeatherProvider::returning(paris())),
        extractor.clone(),
    )
    .await;

    let form = multipart::Form::new()
        .part("file", policy_file())
        .text("prompt", "List the coverage limits");
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Coverage limit is $50,000.");

    let calls = model.calls();
    assert_eq!(calls.len(), 1);
    let message = &calls[0][0].content;
    assert!(message.contains("List the coverage limits"));
    assert!(message.contains("Coverage limit: $50,000"));

    assert_eq!(extractor.call_count(), 1);
    assert_eq!(app.remaining_uploads(), 0);
}

#[tokio::test]
async fn missing_file_is_400_and_nothing_runs() {
    let model = Arc::new(MockTextProvider::new());
    let extractor = Arc::new(MockExtractor::returning("text"));
    let app = TestApp::spawn_with(
        model.clone(),
        Arc::new(MockWeatherProvider::returning(paris())),
        extractor.clone(),
    )
    .await;

    let form = multipart::Form::new().text("prompt", "List the coverage limits");
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("No file uploaded"));
    assert_eq!(extractor.call_count(), 0);
    assert_eq!(model.call_count(), 0);
    assert_eq!(app.remaining_uploads(), 0);
}

#[tokio::test]
async fn non_multipart_request_is_400_json() {
    let model = Arc::new(MockTextProvider::new());
    let extractor = Arc::new(MockExtractor::returning("text"));
    let app = TestApp::spawn_with(
        model.clone(),
        Arc::new(MockWeatherProvider::returning(paris())),
        extractor.clone(),
    )
    .await;

    let response = reqwest::Client::new()
        .post(format!("{}/extractPolicy", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["message"].as_str().unwrap().contains("multipart"));
    assert_eq!(extractor.call_count(), 0);
    assert_eq!(model.call_count(), 0);
    assert_eq!(app.remaining_uploads(), 0);
}

#[tokio::test]
async fn missing_prompt_is_400() {
    let model = Arc::new(MockTextProvider::new());
    let extractor = Arc::new(MockExtractor::returning("text"));
    let app = TestApp::spawn_with(
        model.clone(),
        Arc::new(MockWeatherProvider::returning(paris())),
        extractor.clone(),
    )
    .await;

    let form = multipart::Form::new().part("file", policy_file());
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
    assert_eq!(extractor.call_count(), 0);
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn parse_failure_is_500_and_upload_is_removed() {
    let model = Arc::new(MockTextProvider::new());
    let extractor = Arc::new(MockExtractor::failing());
    let app = TestApp::spawn_with(
        model.clone(),
        Arc::new(MockWeatherProvider::returning(paris())),
        extractor.clone(),
    )
    .await;

    let form = multipart::Form::new()
        .part("file", policy_file())
        .text("prompt", "Summarise");
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("Document parsing failed"));
    assert_eq!(model.call_count(), 0);

    let seen = extractor.seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].1);
    assert!(!seen[0].0.exists());
    assert_eq!(app.remaining_uploads(), 0);
}

#[tokio::test]
async fn model_failure_is_500_and_upload_is_removed() {
    let model = Arc::new(MockTextProvider::scripted([MockReply::Fail(
        "quota exceeded".to_string(),
    )]));
    let app = TestApp::spawn_with(
        model.clone(),
        Arc::new(MockWeatherProvider::returning(paris())),
        Arc::new(MockExtractor::returning("text")),
    )
    .await;

    let form = multipart::Form::new()
        .part("file", policy_file())
        .text("prompt", "Summarise");
    let (status, body) = post_form(&app, form).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("quota exceeded"));
    assert_eq!(app.remaining_uploads(), 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let model = Arc::new(MockTextProvider::new());
    let extractor = Arc::new(MockExtractor::returning("text"));
    let app = TestApp::spawn_with(
        model.clone(),
        Arc::new(MockWeatherProvider::returning(paris())),
        extractor.clone(),
    )
    .await;

    // The test configuration caps uploads at 1 MiB.
    let big = multipart::Part::bytes(vec![b'a'; 3 * 1024 * 1024])
        .file_name("big.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = multipart::Form::new()
        .text("prompt", "Summarise")
        .part("file", big);

    let response = reqwest::Client::new()
        .post(format!("{}/extractPolicy", app.address))
        .multipart(form)
        .send()
        .await;

    // The server may close the connection before the whole body is sent.
    if let Ok(response) = response {
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
    assert_eq!(extractor.call_count(), 0);
    assert_eq!(model.call_count(), 0);
    assert_eq!(app.remaining_uploads(), 0);
}
