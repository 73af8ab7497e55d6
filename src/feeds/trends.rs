use super::{NewsItem, TrendFetcher, TrendRecord};
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;

/// Placeholder substituted with the percent-encoded region code.
pub const REGION_PLACEHOLDER: &str = "{region}";

pub const DEFAULT_FEED_URL_TEMPLATE: &str =
    "https://trends.google.co.jp/trends/trendingsearches/daily/rss?geo={region}";

/// Fetches the daily trending-searches RSS feed for a region.
pub struct GoogleTrendsFetcher {
    url_template: String,
    filter_to_today: bool,
    client: reqwest::Client,
}

impl GoogleTrendsFetcher {
    pub fn new(url_template: String, filter_to_today: bool, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("trends-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            url_template,
            filter_to_today,
            client,
        }
    }

    pub fn feed_url(&self, region: &str) -> String {
        self.url_template
            .replace(REGION_PLACEHOLDER, &urlencoding::encode(region))
    }
}

#[async_trait]
impl TrendFetcher for GoogleTrendsFetcher {
    async fn fetch(&self, region: &str) -> Result<Vec<TrendRecord>, FetchError> {
        let url = self.feed_url(region);
        tracing::info!(%url, "fetching trends feed");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let trends = parse_trends_feed(&body)?;

        let trends = if self.filter_to_today {
            filter_published_on(trends, Local::now().date_naive())
        } else {
            trends
        };

        tracing::info!(region, count = trends.len(), "trends feed decoded");
        Ok(trends)
    }
}

/// Keeps the trends published on `today`, judged in local time.
///
/// Items without a parsable `pubDate` cannot be placed on a day and are dropped.
pub fn filter_published_on(trends: Vec<TrendRecord>, today: NaiveDate) -> Vec<TrendRecord> {
    trends
        .into_iter()
        .filter(|trend| match trend.published() {
            Some(date) => date.with_timezone(&Local).date_naive() == today,
            None => {
                tracing::warn!(
                    title = %trend.title,
                    published_at = %trend.published_at,
                    "dropping trend with unparsable pubDate"
                );
                false
            }
        })
        .collect()
}

/// Decode a daily trends RSS document.
///
/// Elements are matched on their local name, so the `ht:` extension prefix
/// does not need to be bound to any particular namespace URI.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] if the XML is malformed or has no `<channel>`.
pub fn parse_trends_feed(xml: &str) -> Result<Vec<TrendRecord>, FetchError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut trends = Vec::new();
    let mut saw_channel = false;
    let mut current: Option<TrendRecord> = None;
    let mut current_news: Option<NewsItem> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref()).unwrap_or("");
                match name {
                    "channel" => saw_channel = true,
                    "item" => current = Some(TrendRecord::default()),
                    "news_item" if current.is_some() => current_news = Some(NewsItem::default()),
                    _ => current_tag = name.to_string(),
                }
            }
            Event::End(e) => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref()).unwrap_or("");
                match name {
                    "item" => {
                        if let Some(trend) = current.take() {
                            trends.push(trend);
                        }
                    }
                    "news_item" => {
                        if let (Some(trend), Some(news)) = (current.as_mut(), current_news.take()) {
                            trend.related_articles.push(news);
                        }
                    }
                    _ => {}
                }
                current_tag.clear();
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| FetchError::Decode(err.to_string()))?;
                assign_text(&mut current, &mut current_news, &current_tag, &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                assign_text(&mut current, &mut current_news, &current_tag, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_channel {
        return Err(FetchError::Decode("missing <channel> element".to_string()));
    }

    Ok(trends)
}

fn assign_text(
    current: &mut Option<TrendRecord>,
    current_news: &mut Option<NewsItem>,
    tag: &str,
    text: &str,
) {
    if let Some(news) = current_news.as_mut() {
        let field = match tag {
            "news_item_title" => &mut news.title,
            "news_item_snippet" => &mut news.snippet,
            "news_item_url" => &mut news.url,
            "news_item_source" => &mut news.source,
            _ => return,
        };
        field.push_str(text);
        return;
    }

    if let Some(trend) = current.as_mut() {
        let field = match tag {
            "title" => &mut trend.title,
            "approx_traffic" => &mut trend.approx_traffic,
            "description" => &mut trend.description,
            "link" => &mut trend.link,
            "pubDate" => &mut trend.published_at,
            "picture" => &mut trend.thumbnail_url,
            "picture_source" => &mut trend.thumbnail_source,
            _ => return,
        };
        field.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:atom="http://www.w3.org/2005/Atom" xmlns:ht="https://trends.google.co.jp/trends/trendingsearches/daily" version="2.0">
  <channel>
    <title>Daily Search Trends</title>
    <description>Recent searches</description>
    <link>https://trends.google.co.jp/trends/trendingsearches/daily?geo=US</link>
    <item>
      <title>Copa America</title>
      <ht:approx_traffic>500,000+</ht:approx_traffic>
      <description>fox sports, Venezuela vs Argentina</description>
      <link>https://trends.google.co.jp/trends/trendingsearches/daily?geo=US#Copa%20America</link>
      <pubDate>Fri, 28 Jun 2019 13:00:00 -0700</pubDate>
      <ht:picture>https://t2.gstatic.com/images?q=tbn:copa</ht:picture>
      <ht:picture_source>BBC Sport</ht:picture_source>
      <ht:news_item>
        <ht:news_item_title>&lt;b&gt;Copa America&lt;/b&gt; quarter-finals</ht:news_item_title>
        <ht:news_item_snippet>Messi won&#39;t mind.</ht:news_item_snippet>
        <ht:news_item_url>https://www.bbc.co.uk/sport/live/football/48766803</ht:news_item_url>
        <ht:news_item_source>BBC Sport</ht:news_item_source>
      </ht:news_item>
      <ht:news_item>
        <ht:news_item_title>Second story</ht:news_item_title>
        <ht:news_item_url>https://example.com/second</ht:news_item_url>
      </ht:news_item>
    </item>
    <item>
      <title><![CDATA[Wimbledon & more]]></title>
      <ht:approx_traffic>200,000+</ht:approx_traffic>
      <description></description>
      <pubDate>Fri, 28 Jun 2019 09:00:00 -0700</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_trends_feed_items_in_order() {
        let trends = parse_trends_feed(SAMPLE_FEED).unwrap();
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].title, "Copa America");
        assert_eq!(trends[1].title, "Wimbledon & more");
    }

    #[test]
    fn test_parse_trends_feed_extension_fields() {
        let trends = parse_trends_feed(SAMPLE_FEED).unwrap();
        let copa = &trends[0];
        assert_eq!(copa.approx_traffic, "500,000+");
        assert_eq!(copa.description, "fox sports, Venezuela vs Argentina");
        assert_eq!(copa.published_at, "Fri, 28 Jun 2019 13:00:00 -0700");
        assert_eq!(copa.thumbnail_url, "https://t2.gstatic.com/images?q=tbn:copa");
        assert_eq!(copa.thumbnail_source, "BBC Sport");
        assert!(copa.link.ends_with("#Copa%20America"));
    }

    #[test]
    fn test_parse_trends_feed_news_items() {
        let trends = parse_trends_feed(SAMPLE_FEED).unwrap();
        let articles = &trends[0].related_articles;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "<b>Copa America</b> quarter-finals");
        assert_eq!(articles[0].snippet, "Messi won't mind.");
        assert_eq!(
            articles[0].url,
            "https://www.bbc.co.uk/sport/live/football/48766803"
        );
        assert_eq!(articles[0].source, "BBC Sport");
        assert_eq!(articles[1].url, "https://example.com/second");
        assert!(articles[1].source.is_empty());
        assert!(trends[1].related_articles.is_empty());
    }

    #[test]
    fn test_parse_trends_feed_news_title_does_not_leak_into_trend() {
        let trends = parse_trends_feed(SAMPLE_FEED).unwrap();
        assert_eq!(trends[0].title, "Copa America");
    }

    #[test]
    fn test_parse_trends_feed_empty_channel() {
        let xml = r#"<rss version="2.0"><channel><title>Daily Search Trends</title></channel></rss>"#;
        assert!(parse_trends_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_trends_feed_rejects_non_feed() {
        let result = parse_trends_feed("<html><body>Not Found</body></html>");
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_parse_trends_feed_rejects_malformed_xml() {
        let result = parse_trends_feed("<rss><channel><item><title>x</item></channel></rss>");
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_feed_url_encodes_region() {
        let fetcher = GoogleTrendsFetcher::new(
            DEFAULT_FEED_URL_TEMPLATE.to_string(),
            false,
            Duration::from_secs(1),
        );
        assert_eq!(
            fetcher.feed_url("JP"),
            "https://trends.google.co.jp/trends/trendingsearches/daily/rss?geo=JP"
        );
        assert!(fetcher.feed_url("a b&c").ends_with("geo=a%20b%26c"));
    }

    #[test]
    fn test_filter_published_on_keeps_same_local_day() {
        let now = Local::now().fixed_offset();
        let today = TrendRecord {
            title: "today".to_string(),
            published_at: now.to_rfc2822(),
            ..Default::default()
        };
        let last_year = TrendRecord {
            title: "old".to_string(),
            published_at: "Fri, 28 Jun 2019 13:00:00 -0700".to_string(),
            ..Default::default()
        };
        let broken = TrendRecord {
            title: "broken".to_string(),
            published_at: "not a date".to_string(),
            ..Default::default()
        };

        let kept = filter_published_on(vec![last_year, today, broken], now.date_naive());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "today");
    }

    fn feed_with_dates(dates: &[(&str, String)]) -> String {
        let items: String = dates
            .iter()
            .map(|(title, date)| {
                format!(
                    "<item><title>{}</title><pubDate>{}</pubDate></item>",
                    title, date
                )
            })
            .collect();
        format!(
            r#"<rss version="2.0"><channel><title>Daily Search Trends</title>{}</channel></rss>"#,
            items
        )
    }

    #[tokio::test]
    async fn test_fetch_filters_to_today_when_enabled() {
        let body = feed_with_dates(&[
            ("Copa America", "Fri, 28 Jun 2019 13:00:00 -0700".to_string()),
            ("Fresh trend", Local::now().fixed_offset().to_rfc2822()),
        ]);
        let mut server = mockito::Server::new_async().await;
        let _feed = server
            .mock("GET", "/rss")
            .match_query(mockito::Matcher::UrlEncoded(
                "geo".to_string(),
                "US".to_string(),
            ))
            .with_status(200)
            .with_body(body)
            .expect(2)
            .create_async()
            .await;
        let template = format!("{}/rss?geo={}", server.url(), REGION_PLACEHOLDER);

        let filtered = GoogleTrendsFetcher::new(template.clone(), true, Duration::from_secs(5))
            .fetch("US")
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Fresh trend");

        let unfiltered = GoogleTrendsFetcher::new(template, false, Duration::from_secs(5))
            .fetch("US")
            .await
            .unwrap();
        let titles: Vec<&str> = unfiltered.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Copa America", "Fresh trend"]);
    }
}
