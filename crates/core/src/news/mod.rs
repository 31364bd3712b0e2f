//! News module - feed polling, headline sentiment and market mood.

mod news_model;
mod news_service;
mod news_traits;
mod sentiment;
mod sources;
mod text;

pub use news_model::{MarketSentimentSummary, NewsArticle, NewsFeed, TickerMention};
pub use news_service::{summarize, NewsService};
pub use news_traits::NewsServiceTrait;
pub use sentiment::{Sentiment, SentimentLabel, SentimentLexicon, NEUTRAL_SCORE};
pub use sources::default_sources;
pub use text::{clean_text, extract_tickers};
