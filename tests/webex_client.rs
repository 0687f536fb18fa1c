//! WebexClient against a local mock server

use std::time::Duration;

use mockito::Matcher;
use serde_json::json;

use card_notifier::delivery::{
    OutboundMessage, Transport, TransportError, WebexClient, ADAPTIVE_CARD_CONTENT_TYPE,
};
use card_notifier::template::{render, RenderedCard};

fn card() -> RenderedCard {
    render(
        &json!({"type": "AdaptiveCard", "version": "1.3", "body": []}),
        &serde_json::Map::new(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_posts_message_with_bearer_token_and_single_card() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "toPersonEmail": "alice@example.com",
            "markdown": "fallback text",
            "attachments": [{
                "contentType": ADAPTIVE_CARD_CONTENT_TYPE,
                "content": {"type": "AdaptiveCard", "version": "1.3", "body": []}
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"Y2lzY29zcGFyazovL3VzL01FU1NBR0UvMTIz","personEmail":"alice@example.com"}"#)
        .create_async()
        .await;

    let client = WebexClient::new(
        "test-token",
        format!("{}/v1/messages", server.url()),
        Duration::from_secs(5),
    )
    .unwrap();

    let card = card();
    let response = client
        .send(&OutboundMessage::new("alice@example.com", "fallback text", &card))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(response.is_success());
    assert_eq!(
        response.message_id().as_deref(),
        Some("Y2lzY29zcGFyazovL3VzL01FU1NBR0UvMTIz")
    );
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(429)
        .with_body("Too Many Requests\ntry later")
        .create_async()
        .await;

    let client = WebexClient::new(
        "test-token",
        format!("{}/v1/messages", server.url()),
        Duration::from_secs(5),
    )
    .unwrap();

    let card = card();
    let response = client
        .send(&OutboundMessage::new("bob@example.com", "text", &card))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 429);
    assert!(!response.is_success());
    assert_eq!(response.body, "Too Many Requests\ntry later");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Port 1 on localhost refuses connections
    let client = WebexClient::new(
        "test-token",
        "http://127.0.0.1:1/v1/messages",
        Duration::from_secs(5),
    )
    .unwrap();

    let card = card();
    let result = client
        .send(&OutboundMessage::new("carol@example.com", "text", &card))
        .await;

    assert!(matches!(
        result,
        Err(TransportError::Connection(_)) | Err(TransportError::Request(_))
    ));
}
