//! RSS feed provider. One adapter instance per configured source.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rss::Channel;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{FeedItem, FeedSource};
use crate::provider::http::{build_client, get_text, DEFAULT_TIMEOUT};
use crate::provider::traits::ProviderAdapter;

/// Items kept per feed before cleaning and scoring.
pub const DEFAULT_ITEMS_PER_FEED: usize = 6;

pub struct RssFeedProvider {
    client: Client,
    source: FeedSource,
    max_items: usize,
}

impl RssFeedProvider {
    pub fn new(source: FeedSource) -> Self {
        Self::with_timeout(source, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(source: FeedSource, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            source,
            max_items: DEFAULT_ITEMS_PER_FEED,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }
}

/// Parse RFC 2822 (RSS) dates, falling back to RFC 3339.
fn parse_published(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_channel(
    body: &str,
    source: &FeedSource,
    max_items: usize,
    now: DateTime<Utc>,
) -> Result<Vec<FeedItem>, MarketDataError> {
    let channel = Channel::read_from(Cursor::new(body.as_bytes()))
        .map_err(|e| MarketDataError::malformed(&source.name, format!("Invalid RSS: {}", e)))?;

    let items: Vec<FeedItem> = channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            // items without a link or guid cannot be opened
            let link = item
                .link()
                .or_else(|| item.guid().map(|g| g.value()))
                .map(str::trim)
                .filter(|l| !l.is_empty())?
                .to_string();
            Some(FeedItem {
                title,
                description: item.description().unwrap_or_default().to_string(),
                link,
                published: parse_published(item.pub_date()).unwrap_or(now),
                source: source.name.clone(),
                category: source.category,
            })
        })
        .take(max_items)
        .collect();

    debug!("{}: parsed {} items", source.name, items.len());
    Ok(items)
}

#[async_trait]
impl ProviderAdapter<(), Vec<FeedItem>> for RssFeedProvider {
    fn id(&self) -> &str {
        &self.source.name
    }

    async fn fetch(&self, _request: &()) -> Result<Vec<FeedItem>, MarketDataError> {
        let body = get_text(&self.client, &self.source.name, &self.source.url, &[]).await?;
        parse_channel(&body, &self.source, self.max_items, Utc::now())
    }
}
