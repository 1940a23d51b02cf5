//! Integration tests for the remote backend proxy.

mod common;

use common::{TestHarness, API_KEY};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn harness_with_backend(backend: &MockServer) -> TestHarness {
    let mut config = TestHarness::config();
    config.proxy.backend_url = Some(backend.uri());
    TestHarness::start_with(config).await
}

#[tokio::test]
async fn options_are_forwarded_with_headers() {
    let backend = MockServer::start().await;
    let request = json!({"fileUrl": "http://example.com/a.png", "fileName": "a.png"});
    Mock::given(method("POST"))
        .and(path("/api/get-conversion-options"))
        .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
        .and(header("cache-control", "no-cache"))
        .and(body_json(&request))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"sourceCategory": "image", "options": []})),
        )
        .expect(1)
        .mount(&backend)
        .await;

    let h = harness_with_backend(&backend).await;
    let resp = h
        .client
        .post(h.url("/proxy/get-conversion-options"))
        .bearer_auth(API_KEY)
        .header("cache-control", "no-cache")
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["sourceCategory"], "image");
}

#[tokio::test]
async fn backend_status_is_passed_through() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/convert"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Missing required data"})),
        )
        .mount(&backend)
        .await;

    let h = harness_with_backend(&backend).await;
    let resp = h
        .post_json("/api/proxy/convert", Some(API_KEY), &json!({}))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing required data");
}

#[tokio::test]
async fn unreachable_backend_is_a_proxy_failure() {
    let mut config = TestHarness::config();
    config.proxy.backend_url = Some("http://127.0.0.1:9".into());
    config.proxy.timeout_secs = 2;
    let h = TestHarness::start_with(config).await;

    let resp = h
        .post_json("/proxy/convert", Some(API_KEY), &json!({"fileName": "a"}))
        .await;
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to proxy request:"));
}

#[tokio::test]
async fn no_backend_is_unavailable() {
    let h = TestHarness::start().await;
    let resp = h
        .post_json("/proxy/convert", Some(API_KEY), &json!({}))
        .await;
    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn proxy_requires_auth() {
    let backend = MockServer::start().await;
    let h = harness_with_backend(&backend).await;
    let resp = h.post_json("/proxy/convert", None, &json!({})).await;
    assert_eq!(resp.status(), 401);
}
