//! Message delivery transport.
//!
//! The dispatcher talks to a [`Transport`]: one call sends one message to one
//! recipient and returns the raw response. Retries and interpretation of the
//! status code belong to the caller.
//!
//! - `WebexClient`: HTTPS transport for the Webex messages API
//! - test code substitutes scripted implementations

mod webex;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::template::RenderedCard;

pub use webex::{WebexClient, DEFAULT_MESSAGES_URL};

/// Content type Webex expects for Adaptive Card attachments
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Transport-level failure: the request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Card attachment in Webex wire format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment<'a> {
    pub content_type: &'static str,
    pub content: &'a RenderedCard,
}

/// Body of a single 1:1 message.
///
/// Webex accepts only one card per message, so `attachments` is a
/// one-element array rather than a `Vec`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage<'a> {
    pub to_person_email: &'a str,
    /// Fallback text, required whenever an attachment is present
    pub markdown: &'a str,
    pub attachments: [Attachment<'a>; 1],
}

impl<'a> OutboundMessage<'a> {
    pub fn new(to_person_email: &'a str, markdown: &'a str, card: &'a RenderedCard) -> Self {
        Self {
            to_person_email,
            markdown,
            attachments: [Attachment {
                content_type: ADAPTIVE_CARD_CONTENT_TYPE,
                content: card,
            }],
        }
    }
}

/// Raw HTTP response of a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Webex answers 200 (occasionally 201) for an accepted message.
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    /// The `id` field of a JSON body, if there is one.
    pub fn message_id(&self) -> Option<String> {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()?
            .get("id")?
            .as_str()
            .map(str::to_string)
    }
}

/// Sends one message to one recipient.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: &OutboundMessage<'_>) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_statuses() {
        assert!(TransportResponse::new(200, "").is_success());
        assert!(TransportResponse::new(201, "").is_success());
        assert!(!TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(429, "").is_success());
    }

    #[test]
    fn test_message_id_extraction() {
        assert_eq!(
            TransportResponse::new(200, r#"{"id":"Y2lzY29","roomId":"r"}"#).message_id(),
            Some("Y2lzY29".to_string())
        );
        assert_eq!(TransportResponse::new(200, "{}").message_id(), None);
        assert_eq!(TransportResponse::new(200, "not json").message_id(), None);
    }

    #[test]
    fn test_outbound_message_wire_format() {
        let template = json!({"type": "AdaptiveCard", "body": []});
        let card = crate::template::render(&template, &serde_json::Map::new()).unwrap();
        let message = OutboundMessage::new("a@example.com", "hello", &card);

        let wire = serde_json::to_value(&message).unwrap();
        assert_eq!(
            wire,
            json!({
                "toPersonEmail": "a@example.com",
                "markdown": "hello",
                "attachments": [{
                    "contentType": ADAPTIVE_CARD_CONTENT_TYPE,
                    "content": {"type": "AdaptiveCard", "body": []}
                }]
            })
        );
    }
}
