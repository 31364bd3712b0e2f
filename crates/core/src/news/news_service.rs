use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use livetools_market_data::{
    DataClass, FallbackPolicy, FeedItem, FeedProvider, FeedSource, NewsCategory, ProviderChain,
    RssFeedProvider,
};
use log::{debug, info};

use super::news_model::{MarketSentimentSummary, NewsArticle, NewsFeed, TickerMention};
use super::news_traits::NewsServiceTrait;
use super::sentiment::{SentimentLabel, SentimentLexicon, NEUTRAL_SCORE};
use super::text::{clean_text, extract_tickers};
use crate::constants::MAX_NEWS_ARTICLES;
use crate::errors::Result;

/// Tickers listed in the summary.
const TRENDING_TICKERS: usize = 10;

pub struct NewsService {
    chain: ProviderChain<(), Vec<FeedItem>>,
    policy: FallbackPolicy,
    lexicon: SentimentLexicon,
    max_articles: usize,
}

impl NewsService {
    pub fn new(chain: ProviderChain<(), Vec<FeedItem>>, policy: FallbackPolicy) -> Self {
        Self {
            chain,
            policy,
            lexicon: SentimentLexicon::default(),
            max_articles: MAX_NEWS_ARTICLES,
        }
    }

    /// One RSS adapter per source, all polled concurrently.
    pub fn from_sources(sources: Vec<FeedSource>, timeout: Duration, policy: FallbackPolicy) -> Self {
        let providers: Vec<FeedProvider> = sources
            .into_iter()
            .map(|source| Arc::new(RssFeedProvider::with_timeout(source, timeout)) as FeedProvider)
            .collect();
        Self::new(ProviderChain::new(DataClass::News, providers, timeout), policy)
    }

    pub fn with_lexicon(mut self, lexicon: SentimentLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn article(&self, item: FeedItem) -> NewsArticle {
        let title = clean_text(&item.title);
        let description = match clean_text(&item.description) {
            d if d.is_empty() => title.clone(),
            d => d,
        };
        let text = format!("{} {}", title, description);
        let sentiment = self.lexicon.score(&text);

        NewsArticle {
            tickers: extract_tickers(&text),
            title,
            description,
            url: item.link,
            source: item.source,
            published_at: item.published,
            sentiment: sentiment.label,
            sentiment_score: sentiment.score,
            category: item.category,
        }
    }
}

/// Mean score, label counts, per-category means and most mentioned tickers.
pub fn summarize(articles: &[NewsArticle], lexicon: &SentimentLexicon) -> MarketSentimentSummary {
    let mut positive = 0;
    let mut negative = 0;
    let mut neutral = 0;
    let mut categories: BTreeMap<NewsCategory, (f64, usize)> = BTreeMap::new();
    let mut mentions: HashMap<&str, usize> = HashMap::new();

    for article in articles {
        match article.sentiment {
            SentimentLabel::Positive => positive += 1,
            SentimentLabel::Negative => negative += 1,
            SentimentLabel::Neutral => neutral += 1,
        }
        let entry = categories.entry(article.category).or_insert((0.0, 0));
        entry.0 += article.sentiment_score;
        entry.1 += 1;
        for ticker in &article.tickers {
            *mentions.entry(ticker.as_str()).or_default() += 1;
        }
    }

    let average_score = if articles.is_empty() {
        NEUTRAL_SCORE
    } else {
        articles.iter().map(|a| a.sentiment_score).sum::<f64>() / articles.len() as f64
    };

    let mut trending_tickers: Vec<TickerMention> = mentions
        .into_iter()
        .map(|(ticker, mentions)| TickerMention {
            ticker: ticker.to_string(),
            mentions,
        })
        .collect();
    trending_tickers.sort_by(|a, b| b.mentions.cmp(&a.mentions).then_with(|| a.ticker.cmp(&b.ticker)));
    trending_tickers.truncate(TRENDING_TICKERS);

    MarketSentimentSummary {
        average_score,
        trend: lexicon.label(average_score),
        positive,
        negative,
        neutral,
        by_category: categories
            .into_iter()
            .map(|(category, (sum, count))| (category, sum / count as f64))
            .collect(),
        trending_tickers,
    }
}

#[async_trait]
impl NewsServiceTrait for NewsService {
    async fn get_financial_news(&self) -> Result<NewsFeed> {
        let result = self.chain.settle_all(&()).await;
        let outcome = self.policy.recover(DataClass::News, result, Vec::new)?;

        let successful_sources = if outcome.is_synthesized() {
            0
        } else {
            outcome.sources.len()
        };

        let mut articles: Vec<NewsArticle> = outcome
            .value
            .into_iter()
            .flatten()
            .map(|item| self.article(item))
            .collect();
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(self.max_articles);

        info!(
            "News: {} articles from {}/{} sources",
            articles.len(),
            successful_sources,
            self.chain.len()
        );
        debug!("News provenance: {}", outcome.provenance.header_value());

        let summary = summarize(&articles, &self.lexicon);
        Ok(NewsFeed {
            articles,
            total_sources: self.chain.len(),
            successful_sources,
            summary,
            provenance: outcome.provenance,
            timestamp: Utc::now(),
        })
    }
}
