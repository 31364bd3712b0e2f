//! Financial Modeling Prep quote provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{round2, Quote, QuoteDefaults, QuoteRequest};
use crate::provider::http::{build_client, get_text, parse_json, DEFAULT_TIMEOUT};
use crate::provider::traits::ProviderAdapter;

const PROVIDER_ID: &str = "FMP";
const BASE_URL: &str = "https://financialmodelingprep.com/api/v3/quote";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    price: Option<f64>,
    change: Option<f64>,
    changes_percentage: Option<f64>,
    volume: Option<f64>,
    market_cap: Option<f64>,
    pe: Option<f64>,
    year_high: Option<f64>,
    year_low: Option<f64>,
    avg_volume: Option<f64>,
}

pub struct FmpProvider {
    client: Client,
    api_key: String,
    base_url: String,
    defaults: QuoteDefaults,
}

impl FmpProvider {
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

fn parse_quote(body: &str, symbol: &str, defaults: &QuoteDefaults) -> Result<Quote, MarketDataError> {
    // FMP answers an error object instead of an array when the key is rejected
    let value: serde_json::Value = parse_json(PROVIDER_ID, body)?;
    if let Some(message) = value.get("Error Message").and_then(|m| m.as_str()) {
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: message.to_string(),
        });
    }

    let quotes: Vec<FmpQuote> = serde_json::from_value(value)
        .map_err(|e| MarketDataError::malformed(PROVIDER_ID, format!("Unexpected shape: {}", e)))?;
    let data = quotes
        .into_iter()
        .next()
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

    let price = data
        .price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "Missing price"))?;

    let mut quote = Quote::from_price(
        symbol,
        price,
        data.change.unwrap_or(0.0),
        data.changes_percentage.unwrap_or(0.0),
        PROVIDER_ID,
        defaults,
    );
    if let Some(volume) = data.volume {
        quote.volume = volume.max(0.0) as u64;
    }
    if let Some(cap) = data.market_cap {
        quote.market_cap = cap;
    }
    if let Some(pe) = data.pe {
        quote.pe_ratio = round2(pe);
    }
    if let Some(high) = data.year_high {
        quote.fifty_two_week_high = round2(high);
    }
    if let Some(low) = data.year_low {
        quote.fifty_two_week_low = round2(low);
    }
    if let Some(avg) = data.avg_volume {
        quote.avg_volume = avg.max(0.0) as u64;
    }
    Ok(quote)
}

#[async_trait]
impl ProviderAdapter<QuoteRequest, Quote> for FmpProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    async fn fetch(&self, request: &QuoteRequest) -> Result<Quote, MarketDataError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(&request.symbol));
        let body = get_text(
            &self.client,
            PROVIDER_ID,
            &url,
            &[("apikey", self.api_key.as_str())],
        )
        .await?;
        parse_quote(&body, &request.symbol, &self.defaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote() {
        let body = r#"[{"symbol":"SCHD","price":78.456,"changesPercentage":0.51,"change":0.4,"yearHigh":81.2,"yearLow":70.1,"marketCap":58000000000,"pe":15.2,"volume":2500000,"avgVolume":3100000}]"#;
        let quote = parse_quote(body, "SCHD", &QuoteDefaults::default()).unwrap();
        assert_eq!(quote.price, 78.46);
        assert_eq!(quote.fifty_two_week_high, 81.2);
        assert_eq!(quote.pe_ratio, 15.2);
        assert_eq!(quote.avg_volume, 3_100_000);
        assert_eq!(quote.market_cap, 58_000_000_000.0);
        // Not reported by FMP
        assert_eq!(quote.beta, 1.0);
    }

    #[test]
    fn test_empty_array_is_symbol_not_found() {
        let err = parse_quote("[]", "ZZZZ", &QuoteDefaults::default()).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_error_object() {
        let body = r#"{"Error Message":"Invalid API KEY."}"#;
        let err = parse_quote(body, "SCHD", &QuoteDefaults::default()).unwrap_err();
        assert!(matches!(err, MarketDataError::ProviderError { .. }));
    }
}
