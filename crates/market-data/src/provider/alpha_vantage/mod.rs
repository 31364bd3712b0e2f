//! Alpha Vantage provider (GLOBAL_QUOTE endpoint).
//!
//! Alpha Vantage answers HTTP 200 even when it refuses a request; the refusal
//! is carried in `Error Message`, `Note` or `Information` fields.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::errors::MarketDataError;
use crate::models::{Quote, QuoteDefaults, QuoteRequest};
use crate::provider::http::{build_client, get_text, parse_json, DEFAULT_TIMEOUT};
use crate::provider::traits::ProviderAdapter;

const PROVIDER_ID: &str = "ALPHA_VANTAGE";
const BASE_URL: &str = "https://www.alphavantage.co/query";

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// Every value in GLOBAL_QUOTE is a string.
#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "09. change")]
    change: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
    defaults: QuoteDefaults,
}

impl AlphaVantageProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            defaults: QuoteDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: QuoteDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn check_api_error(
    error_message: &Option<String>,
    note: &Option<String>,
    information: &Option<String>,
) -> Result<(), MarketDataError> {
    if let Some(ref msg) = error_message {
        if msg.contains("Invalid API call") || msg.contains("not found") {
            return Err(MarketDataError::SymbolNotFound(msg.clone()));
        }
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: msg.clone(),
        });
    }

    // "Note" and "Information" both carry quota notices
    for msg in [note, information].into_iter().flatten() {
        if msg.contains("API call frequency")
            || msg.contains("rate limit")
            || msg.contains("demo")
        {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        warn!("Alpha Vantage notice: {}", msg);
    }

    Ok(())
}

fn parse_number(field: &Option<String>) -> Option<f64> {
    field
        .as_deref()
        .map(|s| s.trim().trim_end_matches('%'))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_global_quote(
    body: &str,
    symbol: &str,
    defaults: &QuoteDefaults,
) -> Result<Quote, MarketDataError> {
    let response: GlobalQuoteResponse = parse_json(PROVIDER_ID, body)?;
    check_api_error(&response.error_message, &response.note, &response.information)?;

    let data = response
        .global_quote
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

    let price = parse_number(&data.price)
        .filter(|p| *p > 0.0)
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "Missing or invalid price"))?;
    let change = parse_number(&data.change).unwrap_or(0.0);
    let change_percent = parse_number(&data.change_percent).unwrap_or(0.0);

    let mut quote = Quote::from_price(symbol, price, change, change_percent, PROVIDER_ID, defaults);
    if let Some(volume) = parse_number(&data.volume) {
        quote.volume = volume.max(0.0) as u64;
    }
    Ok(quote)
}

#[async_trait]
impl ProviderAdapter<QuoteRequest, Quote> for AlphaVantageProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    async fn fetch(&self, request: &QuoteRequest) -> Result<Quote, MarketDataError> {
        let body = get_text(
            &self.client,
            PROVIDER_ID,
            &self.base_url,
            &[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", request.symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ],
        )
        .await?;
        parse_global_quote(&body, &request.symbol, &self.defaults)
    }
}
