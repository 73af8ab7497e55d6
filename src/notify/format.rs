use super::{AttachmentField, MessageAttachment};
use crate::feeds::TrendRecord;
use chrono::Datelike;
use serde::Deserialize;

/// How much of each trend ends up in its attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Title, description and picture.
    Minimal,
    /// Adds date and traffic fields plus a link to the lead article.
    #[default]
    Rich,
}

/// Turn trends into ranked attachments, one per trend, in order.
///
/// Never fails: a field that cannot be derived for one trend is left out of
/// that trend's attachment only.
pub fn format_trends(trends: &[TrendRecord], presentation: Presentation) -> Vec<MessageAttachment> {
    trends
        .iter()
        .enumerate()
        .map(|(i, trend)| match presentation {
            Presentation::Minimal => minimal_attachment(i + 1, trend),
            Presentation::Rich => rich_attachment(i + 1, trend),
        })
        .collect()
}

fn minimal_attachment(rank: usize, trend: &TrendRecord) -> MessageAttachment {
    MessageAttachment {
        title: format!("{}. {}", rank, trend.title),
        text: non_empty(&trend.description),
        image_url: non_empty(&trend.thumbnail_url),
        ..Default::default()
    }
}

fn rich_attachment(rank: usize, trend: &TrendRecord) -> MessageAttachment {
    let mut fields = Vec::with_capacity(2);
    if let Some(date) = trend.published() {
        fields.push(short_field("Date", format!("{}/{}", date.month(), date.day())));
    }
    if let Some(traffic) = non_empty(&trend.approx_traffic) {
        fields.push(short_field("Approx Traffic", traffic));
    }

    MessageAttachment {
        title: format!("{}. {}", rank, trend.title),
        title_link: trend
            .related_articles
            .first()
            .and_then(|article| non_empty(&article.url)),
        text: non_empty(&trend.description),
        thumb_url: non_empty(&trend.thumbnail_url),
        fields,
        ..Default::default()
    }
}

fn short_field(title: &str, value: String) -> AttachmentField {
    AttachmentField {
        title: title.to_string(),
        value,
        short: true,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
