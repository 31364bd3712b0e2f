//! Provider adapter trait definitions.
//!
//! One generic trait covers every data class. The request type says what is
//! being asked for and the output type is the normalised answer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{FeedItem, HistoryRequest, PricePoint, Quote, QuoteRequest, RateRequest, RateTable};

/// A wrapper around one external data source.
///
/// Adapters perform exactly one outbound call per `fetch` and do not retry.
/// The chain runner bounds each call with its own timeout, so adapters only
/// need a client-level timeout as a backstop.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use livetools_market_data::provider::ProviderAdapter;
///
/// struct MyRates;
///
/// #[async_trait]
/// impl ProviderAdapter<RateRequest, RateTable> for MyRates {
///     fn id(&self) -> &str {
///         "MY_RATES"
///     }
///
///     async fn fetch(&self, request: &RateRequest) -> Result<RateTable, MarketDataError> {
///         // ... one HTTP call, parse, normalise
///     }
/// }
/// ```
#[async_trait]
pub trait ProviderAdapter<Req, Out>: Send + Sync
where
    Req: Send + Sync,
{
    /// Identifier used in logs, diagnostics and the `source` field of results.
    fn id(&self) -> &str;

    /// Lower values are tried first in sequential chains. Default is 10.
    fn priority(&self) -> u8 {
        10
    }

    /// Perform one fetch.
    async fn fetch(&self, request: &Req) -> Result<Out, MarketDataError>;
}

/// Adapter producing exchange rate tables.
pub type RateProvider = Arc<dyn ProviderAdapter<RateRequest, RateTable>>;

/// Adapter producing latest ETF quotes.
pub type QuoteProvider = Arc<dyn ProviderAdapter<QuoteRequest, Quote>>;

/// Adapter producing daily price history.
pub type HistoryProvider = Arc<dyn ProviderAdapter<HistoryRequest, Vec<PricePoint>>>;

/// Adapter reading one news feed. Feeds take no request parameters.
pub type FeedProvider = Arc<dyn ProviderAdapter<(), Vec<FeedItem>>>;
