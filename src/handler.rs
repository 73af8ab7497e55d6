//! Inbound event handling.
//!
//! A request body is either a URL-verification handshake, answered by echoing
//! its challenge, or a message event, which runs the fetch, format and post
//! pipeline for the region named in the message.

use crate::error::RelayError;
use crate::feeds::TrendFetcher;
use crate::notify::format::{format_trends, Presentation};
use crate::notify::Notifier;
use crate::region::RegionStrategy;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "client_msg_id", default)]
    pub message_id: String,
    pub text: String,
    pub channel: String,
}

#[derive(Debug, Deserialize)]
struct Handshake {
    #[serde(default)]
    challenge: String,
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    event: InboundEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    Handshake(String),
    Event(InboundEvent),
}

/// Decode a webhook body. A non-empty `challenge` wins over everything else.
pub fn decode_payload(body: &[u8]) -> Result<InboundPayload, RelayError> {
    if let Ok(handshake) = serde_json::from_slice::<Handshake>(body) {
        if !handshake.challenge.is_empty() {
            return Ok(InboundPayload::Handshake(handshake.challenge));
        }
    }

    let envelope: EventEnvelope = serde_json::from_slice(body)?;
    Ok(InboundPayload::Event(envelope.event))
}

/// Outcome of one request, independent of the HTTP framework serving it.
#[derive(Debug)]
pub enum Reply {
    Challenge(String),
    Delivered,
    Rejected(RelayError),
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Self::Challenge(_) | Self::Delivered => 200,
            Self::Rejected(_) => 400,
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::Challenge(challenge) => challenge.clone(),
            Self::Delivered => String::new(),
            Self::Rejected(err) => err.to_string(),
        }
    }
}

pub struct EventHandler {
    fetcher: Arc<dyn TrendFetcher>,
    notifier: Arc<dyn Notifier>,
    region_strategy: RegionStrategy,
    presentation: Presentation,
}

impl EventHandler {
    pub fn new(
        fetcher: Arc<dyn TrendFetcher>,
        notifier: Arc<dyn Notifier>,
        region_strategy: RegionStrategy,
        presentation: Presentation,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            region_strategy,
            presentation,
        }
    }

    pub async fn handle(&self, body: &[u8]) -> Reply {
        tracing::debug!(body = %String::from_utf8_lossy(body), "inbound request");

        let result = match decode_payload(body) {
            Ok(InboundPayload::Handshake(challenge)) => {
                tracing::info!("answering url verification handshake");
                return Reply::Challenge(challenge);
            }
            Ok(InboundPayload::Event(event)) => self.relay(&event).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => Reply::Delivered,
            Err(err) => {
                tracing::warn!(error = %err, "request rejected");
                Reply::Rejected(err)
            }
        }
    }

    /// Fetch trends for the region named in `event` and post them back to
    /// its channel. Nothing is posted unless the whole fetch succeeds.
    pub async fn relay(&self, event: &InboundEvent) -> Result<(), RelayError> {
        tracing::info!(
            message_id = %event.message_id,
            channel = %event.channel,
            "relaying trends"
        );

        let region = self
            .region_strategy
            .extract(&event.text)
            .ok_or(RelayError::RegionNotFound)?;

        let trends = self.fetcher.fetch(&region).await?;
        let attachments = format_trends(&trends, self.presentation);
        self.notifier.post(&event.channel, &attachments).await?;

        Ok(())
    }
}
