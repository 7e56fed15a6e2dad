//! Integration tests for the Telegraph client against a mock server.
//!
//! Run with: cargo test -p peekcore --test publish_test

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use peekcore::core::error::AppError;
use peekcore::publish::TelegraphClient;

const FRAGMENT: &str = "<h4>🎞 Video</h4><pre>Format : AVC\n</pre>";

#[tokio::test]
async fn publish_with_configured_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/createPage"))
        .and(body_partial_json(json!({
            "access_token": "token-123",
            "title": "movie.mkv",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "url": "https://telegra.ph/movie-08-06" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TelegraphClient::with_base_url(server.uri(), Some("token-123".to_string())).unwrap();
    let url = client.publish("movie.mkv", FRAGMENT).await.unwrap();

    assert_eq!(url, "https://telegra.ph/movie-08-06");
}

#[tokio::test]
async fn publish_creates_account_when_token_missing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/createAccount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "access_token": "fresh-token" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/createPage"))
        .and(body_partial_json(json!({ "access_token": "fresh-token" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "url": "https://telegra.ph/page-1" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = TelegraphClient::with_base_url(server.uri(), None).unwrap();

    // Two publishes, but the account is created only once
    let first = client.publish("a", FRAGMENT).await.unwrap();
    let second = client.publish("b", FRAGMENT).await.unwrap();

    assert_eq!(first, "https://telegra.ph/page-1");
    assert_eq!(second, "https://telegra.ph/page-1");
}

#[tokio::test]
async fn publish_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/createPage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "error": "CONTENT_TEXT_REQUIRED"
        })))
        .mount(&server)
        .await;

    let client = TelegraphClient::with_base_url(server.uri(), Some("t".to_string())).unwrap();
    let err = client.publish("movie.mkv", FRAGMENT).await.unwrap_err();

    match err {
        AppError::Publish(message) => assert_eq!(message, "CONTENT_TEXT_REQUIRED"),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn publish_surfaces_http_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/createPage"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = TelegraphClient::with_base_url(server.uri(), Some("t".to_string())).unwrap();
    let err = client.publish("movie.mkv", FRAGMENT).await.unwrap_err();

    assert!(matches!(err, AppError::HttpStatus(status) if status.as_u16() == 503));
}
