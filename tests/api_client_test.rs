//! REST client tests using wiremock.

use feedterm::adapters::ReqwestApiClient;
use feedterm::config::HttpConfig;
use feedterm::error::{ApiError, ErrorCategory};
use feedterm::models::Instance;
use feedterm::traits::{ApiClient, Visibility};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestApiClient {
    let instance = Instance::new(format!("{}/api", server.uri()), "alice", "test-token");
    ReqwestApiClient::new(&instance, &HttpConfig::default()).unwrap()
}

#[tokio::test]
async fn test_create_post_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/create"))
        .and(body_json(serde_json::json!({
            "i": "test-token",
            "visibility": "home",
            "text": "hello from the terminal"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "createdNote": {
                "id": "9xyz",
                "createdAt": "2024-05-01T12:00:00.000Z",
                "text": "hello from the terminal"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client
        .create_post(Visibility::Home, "hello from the terminal")
        .await;
    assert_eq!(id, Ok("9xyz".to_string()));
}

#[tokio::test]
async fn test_empty_post_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(
        client.create_post(Visibility::Public, "   ").await,
        Err(ApiError::EmptyPost)
    );
}

#[tokio::test]
async fn test_rejected_token_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/create"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"error\":\"CREDENTIAL_REQUIRED\"}"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_post(Visibility::Public, "hi")
        .await
        .unwrap_err();
    match &err {
        ApiError::Status { status, body } => {
            assert_eq!(*status, 401);
            assert!(body.contains("CREDENTIAL_REQUIRED"));
        }
        other => panic!("expected Status, got {:?}", other),
    }
    assert_eq!(err.category(), ErrorCategory::User);
    assert!(err.user_message().contains("access token"));
}

#[tokio::test]
async fn test_server_error_category() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .create_post(Visibility::Public, "hi")
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Server);
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/notes/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let result = client_for(&server).create_post(Visibility::Public, "hi").await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_meta() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/meta"))
        .and(body_json(serde_json::json!({"i": "test-token", "detail": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Example Instance",
            "version": "2024.3.1",
            "maintainerName": "admin",
            "description": null,
            "features": {"registration": false}
        })))
        .mount(&server)
        .await;

    let meta = client_for(&server).meta().await.unwrap();
    assert_eq!(meta.name.as_deref(), Some("Example Instance"));
    assert_eq!(meta.version.as_deref(), Some("2024.3.1"));
    assert_eq!(meta.maintainer_name.as_deref(), Some("admin"));
    assert_eq!(meta.description, None);
}

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let instance = Instance::new("http://127.0.0.1:1/api", "alice", "t");
    let client = ReqwestApiClient::new(&instance, &HttpConfig::default()).unwrap();
    let err = client.meta().await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::Request { .. } | ApiError::Timeout { .. }
    ));
    assert_eq!(err.category(), ErrorCategory::Network);
}
