use pssst_chat::core::config::Profile;
use pssst_chat::messaging::{MessageService, PssstClient, TransportError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn profile_for(server: &MockServer, token: Option<&str>) -> Profile {
    Profile {
        username: "alice".to_string(),
        token: token.map(str::to_string),
        server: server.uri(),
    }
}

// ============================================================================
// Push Tests
// ============================================================================

#[tokio::test]
async fn test_push_posts_json_to_the_receiver_box() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/bob"))
        .and(body_json(serde_json::json!({
            "from": "alice",
            "message": "hello there",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PssstClient::new(profile_for(&mock_server, None));
    let result = client.push("bob", "hello there").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_push_error_status_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/bob"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let client = PssstClient::new(profile_for(&mock_server, None));
    let err = client.push("bob", "hi").await.unwrap_err();

    match err {
        TransportError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "forbidden");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_push_sends_bearer_token_when_profile_has_one() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/bob"))
        .and(header("authorization", "Bearer secret-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PssstClient::new(profile_for(&mock_server, Some("secret-123")));
    let result = client.push("bob", "hi").await;

    assert!(result.is_ok());
}

// ============================================================================
// Pull Tests
// ============================================================================

#[tokio::test]
async fn test_pull_returns_messages_as_bytes_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/alice/pull"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": ["hello", "world"],
        })))
        .mount(&mock_server)
        .await;

    let client = PssstClient::new(profile_for(&mock_server, None));
    let messages = client.pull().await.unwrap();

    assert_eq!(messages, vec![b"hello".to_vec(), b"world".to_vec()]);
}

#[tokio::test]
async fn test_pull_with_no_queued_messages_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/alice/pull"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let client = PssstClient::new(profile_for(&mock_server, None));
    let messages = client.pull().await.unwrap();

    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_pull_error_status_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/alice/pull"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = PssstClient::new(profile_for(&mock_server, None));
    let err = client.pull().await.unwrap_err();

    assert!(matches!(err, TransportError::Api { status: 500, .. }));
}

#[tokio::test]
async fn test_pull_malformed_body_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/alice/pull"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = PssstClient::new(profile_for(&mock_server, None));
    let err = client.pull().await.unwrap_err();

    assert!(matches!(err, TransportError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_server_maps_to_network_error() {
    // Bind-then-drop leaves a port nothing is listening on.
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let client = PssstClient::new(Profile {
        username: "alice".to_string(),
        token: None,
        server: uri,
    });
    let err = client.pull().await.unwrap_err();

    assert!(matches!(err, TransportError::Network(_)));
}
