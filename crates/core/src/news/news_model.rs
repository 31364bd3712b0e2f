use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use livetools_market_data::{NewsCategory, Provenance};
use serde::{Deserialize, Serialize};

use super::sentiment::SentimentLabel;

/// A cleaned, scored feed item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub sentiment: SentimentLabel,
    pub sentiment_score: f64,
    pub category: NewsCategory,
    pub tickers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMention {
    pub ticker: String,
    pub mentions: usize,
}

/// Aggregate mood over a set of articles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSentimentSummary {
    pub average_score: f64,
    pub trend: SentimentLabel,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub by_category: BTreeMap<NewsCategory, f64>,
    pub trending_tickers: Vec<TickerMention>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFeed {
    pub articles: Vec<NewsArticle>,
    pub total_sources: usize,
    pub successful_sources: usize,
    pub summary: MarketSentimentSummary,
    pub provenance: Provenance,
    pub timestamp: DateTime<Utc>,
}
