//! Webex messages API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{OutboundMessage, Transport, TransportError, TransportResponse};

/// Create-message endpoint of the Webex REST API
pub const DEFAULT_MESSAGES_URL: &str = "https://webexapis.com/v1/messages";

/// Bot-token authenticated client for `POST /v1/messages`.
#[derive(Clone)]
pub struct WebexClient {
    http_client: Client,
    messages_url: String,
    bot_token: String,
}

impl std::fmt::Debug for WebexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebexClient")
            .field("messages_url", &self.messages_url)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

impl WebexClient {
    /// Create a client with a per-request `timeout`.
    pub fn new(
        bot_token: impl Into<String>,
        messages_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            messages_url: messages_url.into(),
            bot_token: bot_token.into(),
        })
    }
}

#[async_trait]
impl Transport for WebexClient {
    async fn send(&self, message: &OutboundMessage<'_>) -> Result<TransportResponse, TransportError> {
        tracing::debug!(to = %message.to_person_email, "Posting message to Webex");

        let response = self
            .http_client
            .post(&self.messages_url)
            .bearer_auth(&self.bot_token)
            .json(message)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}
