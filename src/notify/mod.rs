pub mod format;
pub mod slack;

use crate::error::PostError;
use async_trait::async_trait;
use serde::Serialize;

/// A decorated block inside a chat message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageAttachment {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

/// Body of a `chat.postMessage` call.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage<'a> {
    pub channel: &'a str,
    pub mrkdwn: bool,
    pub attachments: &'a [MessageAttachment],
}

impl<'a> OutboundMessage<'a> {
    pub fn new(channel: &'a str, attachments: &'a [MessageAttachment]) -> Self {
        Self {
            channel,
            mrkdwn: true,
            attachments,
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post(&self, channel: &str, attachments: &[MessageAttachment]) -> Result<(), PostError>;
}
