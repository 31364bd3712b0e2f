//! ExchangeRate-API (v4 open endpoint) rate provider.

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

const PROVIDER_ID: &str = "EXCHANGERATE_API";
const BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    base: String,
    date: Option<String>,
    rates: HashMap<String, f64>,
}

/// Rates from `api.exchangerate-api.com`. No key required.
pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: String,
}

impl ExchangeRateApiProvider {
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

impl Default for ExchangeRateApiProvider {
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
impl ProviderAdapter<RateRequest, RateTable> for ExchangeRateApiProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    async fn fetch(&self, request: &RateRequest) -> Result<RateTable, MarketDataError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(&request.base));
        let body = get_text(&self.client, PROVIDER_ID, &url, &[]).await?;
        parse_latest(&body, &request.base)
    }
}
