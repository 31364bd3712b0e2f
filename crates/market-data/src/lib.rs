//! Live Tools Market Data Crate
//!
//! Provider adapters, fallback chains and reconciliation for the data the
//! live tools widgets display: exchange rates, ETF quotes and price history,
//! and financial news feeds.
//!
//! # Architecture
//!
//! ```text
//!                 +------------------+
//!                 |  ProviderChain   |  (first_success | settle_all, timeout per call)
//!                 +------------------+
//!                    |      |      |
//!                    v      v      v
//!                 +------------------+
//!                 | ProviderAdapter  |  (Yahoo, Frankfurter, RSS, ...)
//!                 +------------------+
//!                          |
//!                          v
//!                 +------------------+
//!                 |  ChainOutcome    |  (value + Provenance)
//!                 +------------------+
//!                          |
//!            +-------------+-------------+
//!            v                           v
//!   +------------------+       +------------------+
//!   |  median merge    |       |  FallbackPolicy  |  (refuse | synthesize)
//!   +------------------+       +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`ProviderAdapter`] - One external source behind a uniform fetch contract
//! - [`ProviderChain`] - Sequential and settle-all runners
//! - [`FallbackPolicy`] - What a chain does once every provider failed
//! - [`Provenance`] - Live / partial / synthesized marker on every outcome
//! - [`RateTable`], [`Quote`], [`PricePoint`], [`FeedItem`] - Normalised data

pub mod errors;
pub mod models;
pub mod provider;
pub mod reconcile;
pub mod registry;
pub mod synthetic;

// Re-export all public types from models
pub use models::{
    normalize_currency, round2, Currency, DataClass, FeedItem, FeedSource, HistoryRequest,
    NewsCategory, PricePoint, ProviderId, Provenance, Quote, QuoteDefaults, QuoteRequest,
    RateRequest, RateTable, Symbol,
};

pub use errors::{MarketDataError, RetryClass};

// Re-export provider types
pub use provider::alpha_vantage::AlphaVantageProvider;
pub use provider::currency_api::CurrencyApiProvider;
pub use provider::exchangerate_api::ExchangeRateApiProvider;
pub use provider::exchangerate_host::ExchangeRateHostProvider;
pub use provider::fixer::FixerProvider;
pub use provider::fmp::FmpProvider;
pub use provider::frankfurter::FrankfurterProvider;
pub use provider::open_er_api::OpenErApiProvider;
pub use provider::rss_feed::RssFeedProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{FeedProvider, HistoryProvider, ProviderAdapter, QuoteProvider, RateProvider};

// Re-export registry types
pub use registry::{
    ChainOutcome, FallbackPolicy, FetchDiagnostics, ProviderAttempt, ProviderChain,
    SYNTHETIC_SOURCE,
};

pub use reconcile::{median, median_merge, merge_rate_tables};
pub use synthetic::{MarketBias, SyntheticHistory, SyntheticQuotes, SyntheticRateSet, SyntheticRates};
