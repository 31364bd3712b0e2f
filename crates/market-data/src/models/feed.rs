use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Editorial category of a news source.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Market,
    Crypto,
    Economy,
    Earnings,
    Geopolitical,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Market => "market",
            NewsCategory::Crypto => "crypto",
            NewsCategory::Economy => "economy",
            NewsCategory::Earnings => "earnings",
            NewsCategory::Geopolitical => "geopolitical",
        }
    }
}

/// A configured RSS source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    pub category: NewsCategory,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, category: NewsCategory) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            category,
        }
    }
}

/// One raw item read from a feed, before cleaning and scoring.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub source: String,
    pub category: NewsCategory,
}
