//! Slack `chat.postMessage` client.

use super::{MessageAttachment, Notifier, OutboundMessage};
use crate::config::Credential;
use crate::error::PostError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_POST_URL: &str = "https://slack.com/api/chat.postMessage";

/// Posts attachments to a channel with a bot token.
///
/// Slack answers API failures with HTTP 200 and `{"ok": false}`, so the body
/// is checked as well as the status.
pub struct SlackNotifier {
    post_url: String,
    credential: Credential,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackNotifier {
    pub fn new(post_url: String, credential: Credential, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            post_url,
            credential,
            client,
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn post(&self, channel: &str, attachments: &[MessageAttachment]) -> Result<(), PostError> {
        tracing::info!(channel, attachments = attachments.len(), "posting message");

        let response = self
            .client
            .post(&self.post_url)
            .header(
                "Authorization",
                format!("Bearer {}", self.credential.expose()),
            )
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&OutboundMessage::new(channel, attachments))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let result: PostMessageResponse =
            serde_json::from_str(&body).map_err(|e| PostError::Decode(e.to_string()))?;

        if !result.ok {
            return Err(PostError::Api(
                result.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        Ok(())
    }
}
