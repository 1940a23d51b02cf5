//! Integration tests for the bearer-token gate.

mod common;

use common::{TestHarness, ANON_TOKEN, API_KEY};
use serde_json::{json, Value};

fn options_body() -> Value {
    json!({"fileUrl": "http://example.com/a.png", "fileName": "a.png"})
}

#[tokio::test]
async fn health_needs_no_token() {
    let h = TestHarness::start().await;
    let resp = h.client.get(h.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn missing_header_is_rejected() {
    let h = TestHarness::start().await;
    let resp = h
        .post_json("/get-conversion-options", None, &options_body())
        .await;
    assert_eq!(resp.status(), 401);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Authorization header missing or invalid");
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let h = TestHarness::start().await;
    let resp = h
        .client
        .post(h.url("/get-conversion-options"))
        .header("authorization", format!("Basic {API_KEY}"))
        .json(&options_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn unknown_token_is_invalid() {
    let h = TestHarness::start().await;
    let resp = h
        .post_json("/get-conversion-options", Some("wrong"), &options_body())
        .await;
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid authorization token");
}

#[tokio::test]
async fn api_key_and_anonymous_tokens_are_accepted() {
    let h = TestHarness::start().await;
    for token in [API_KEY, ANON_TOKEN] {
        let resp = h
            .post_json("/get-conversion-options", Some(token), &options_body())
            .await;
        assert_eq!(resp.status(), 200, "token {token}");
    }
}

#[tokio::test]
async fn anonymous_tokens_can_be_disabled() {
    let mut config = TestHarness::config();
    config.auth.allow_anonymous = false;
    let h = TestHarness::start_with(config).await;
    let resp = h
        .post_json("/get-conversion-options", Some(ANON_TOKEN), &options_body())
        .await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn disabled_auth_admits_requests_without_token() {
    let mut config = TestHarness::config();
    config.auth.enabled = false;
    let h = TestHarness::start_with(config).await;
    let resp = h
        .post_json("/get-conversion-options", None, &options_body())
        .await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let h = TestHarness::start().await;
    let resp = h
        .client
        .get(h.url("/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("x-request-id").unwrap(),
        "trace-me-123"
    );
}

#[tokio::test]
async fn rate_limit_returns_429() {
    let mut config = TestHarness::config();
    config.server.rate_limit_per_minute = 2;
    let h = TestHarness::start_with(config).await;

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let resp = h
            .post_json("/get-conversion-options", Some(API_KEY), &options_body())
            .await;
        statuses.push(resp.status().as_u16());
    }
    assert_eq!(statuses, vec![200, 200, 429]);
}
