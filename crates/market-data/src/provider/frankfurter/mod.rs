//! Frankfurter (ECB reference rates) provider.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{RateRequest, RateTable};
use crate::provider::http::{build_client, get_text, parse_json, DEFAULT_TIMEOUT};
use crate::provider::normalize::rate_table;
use crate::provider::traits::ProviderAdapter;

const PROVIDER_ID: &str = "FRANKFURTER";
const BASE_URL: &str = "https://api.frankfurter.app/latest";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: Option<String>,
    rates: HashMap<String, f64>,
}

/// Rates from `api.frankfurter.app`. Covers the ECB basket only.
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_latest(body: &str, requested_base: &str) -> Result<RateTable, MarketDataError> {
    let response: LatestResponse = parse_json(PROVIDER_ID, body)?;
    rate_table(
        PROVIDER_ID,
        requested_base,
        &response.base,
        response.date.as_deref(),
        response.rates,
    )
}

#[async_trait]
impl ProviderAdapter<RateRequest, RateTable> for FrankfurterProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
    }

    async fn fetch(&self, request: &RateRequest) -> Result<RateTable, MarketDataError> {
        let body = get_text(
            &self.client,
            PROVIDER_ID,
            &self.base_url,
            &[("from", request.base.as_str())],
        )
        .await?;
        parse_latest(&body, &request.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest() {
        let body = r#"{"amount":1.0,"base":"USD","date":"2024-05-02","rates":{"EUR":0.93,"GBP":0.8,"MXN":16.9}}"#;
        let table = parse_latest(body, "USD").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rate("MXN"), Some(16.9));
    }

    #[test]
    fn test_unexpected_shape_is_malformed() {
        let err = parse_latest(r#"{"message":"not found"}"#, "USD").unwrap_err();
        assert!(matches!(err, MarketDataError::MalformedPayload { .. }));
    }
}
