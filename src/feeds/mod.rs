pub mod trends;

use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// One `<item>` of a daily trends feed, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendRecord {
    pub title: String,
    pub approx_traffic: String,
    pub description: String,
    pub link: String,
    /// RFC 2822, as published by the feed (`Fri, 28 Jun 2019 13:00:00 -0700`).
    pub published_at: String,
    pub thumbnail_url: String,
    pub thumbnail_source: String,
    pub related_articles: Vec<NewsItem>,
}

impl TrendRecord {
    /// Publication time in the feed's own offset, or `None` when the date
    /// is missing or malformed.
    pub fn published(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(self.published_at.trim()).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub source: String,
}

#[async_trait]
pub trait TrendFetcher: Send + Sync {
    async fn fetch(&self, region: &str) -> Result<Vec<TrendRecord>, FetchError>;
}
