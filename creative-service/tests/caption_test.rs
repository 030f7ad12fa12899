mod common;

use common::{TestApp, SHARED_SECRET};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn missing_auth_header_is_rejected_before_any_backend_call() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.caption_backend)
        .await;

    let client = Client::new();
    let response = client
        .post(&format!("{}/generate_caption", app.address))
        .header("prompt", "a caption for my soap")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);

    app.cleanup().await;
}

#[tokio::test]
async fn wrong_auth_header_is_rejected_before_any_backend_call() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.caption_backend)
        .await;

    let client = Client::new();
    let response = client
        .post(&format!("{}/generate_caption", app.address))
        .header("auth", "not-the-secret")
        .header("prompt", "a caption for my soap")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);

    app.cleanup().await;
}

#[tokio::test]
async fn missing_prompt_header_is_rejected_before_any_backend_call() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.caption_backend)
        .await;

    let client = Client::new();
    let response = client
        .post(&format!("{}/generate_caption", app.address))
        .header("auth", SHARED_SECRET)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let error = body["error"].as_str().expect("error should be a string");
    assert!(error.contains("prompt"));

    app.cleanup().await;
}

#[tokio::test]
async fn blank_prompt_header_is_rejected() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.caption_backend)
        .await;

    let client = Client::new();
    let response = client
        .post(&format!("{}/generate_caption", app.address))
        .header("auth", SHARED_SECRET)
        .header("prompt", "   ")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn caption_relays_the_prompt_and_unwraps_the_output_field() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("authorization", "Bearer caption-test-token"))
        .and(body_json(json!({
            "prompt": "a caption for my soap",
            "top_p": 0.8,
            "temperature": 0.95
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "hello"})))
        .expect(1)
        .mount(&app.caption_backend)
        .await;

    let client = Client::new();
    let response = client
        .post(&format!("{}/generate_caption", app.address))
        .header("auth", SHARED_SECRET)
        .header("prompt", "a caption for my soap")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({"response": "hello"}));

    app.cleanup().await;
}

#[tokio::test]
async fn caption_bodies_without_an_output_field_are_passed_through_whole() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foo": 1})))
        .expect(1)
        .mount(&app.caption_backend)
        .await;

    let client = Client::new();
    let response = client
        .post(&format!("{}/generate_caption", app.address))
        .header("auth", SHARED_SECRET)
        .header("prompt", "a caption for my soap")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({"response": {"foo": 1}}));

    app.cleanup().await;
}

#[tokio::test]
async fn upstream_error_status_and_body_are_relayed() {
    let app = TestApp::spawn().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&app.caption_backend)
        .await;

    let client = Client::new();
    let response = client
        .post(&format!("{}/generate_caption", app.address))
        .header("auth", SHARED_SECRET)
        .header("prompt", "a caption for my soap")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 503);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Upstream service error");
    assert_eq!(body["details"], "overloaded");

    app.cleanup().await;
}
