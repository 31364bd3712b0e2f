//! Provider adapters and the trait they implement.
//!
//! This module contains:
//! - The generic `ProviderAdapter` trait and per-data-class aliases
//! - Shared HTTP and rate normalisation helpers
//! - Concrete adapters for FX rates, ETF quotes/history and RSS feeds
//!
//! Adapters are deliberately small: one outbound call, one parse, one
//! normalised value or one classified error. Ordering, timeouts and
//! fallback live in the registry module.

mod http;
mod normalize;
mod traits;

// FX rates
pub mod currency_api;
pub mod exchangerate_api;
pub mod exchangerate_host;
pub mod fixer;
pub mod frankfurter;
pub mod open_er_api;

// ETF quotes and history
pub mod alpha_vantage;
pub mod fmp;
pub mod yahoo;

// News
pub mod rss_feed;

// Re-exports
pub use http::DEFAULT_TIMEOUT;
pub use traits::{FeedProvider, HistoryProvider, ProviderAdapter, QuoteProvider, RateProvider};
