//! Market data models
//!
//! This module contains the data types exchanged with providers:
//! - `types` - Identifiers, data classes and small normalisation helpers
//! - `quote` - ETF quotes and daily price history
//! - `rates` - Exchange rate tables
//! - `feed` - RSS sources and raw feed items
//! - `provenance` - Live / partial / synthesized markers

mod feed;
mod provenance;
mod quote;
mod rates;
mod types;

pub use feed::{FeedItem, FeedSource, NewsCategory};
pub use provenance::Provenance;
pub use quote::{HistoryRequest, PricePoint, Quote, QuoteDefaults, QuoteRequest};
pub use rates::{is_valid_rate, RateRequest, RateTable};
pub use types::{normalize_currency, round2, Currency, DataClass, ProviderId, Symbol};
