//! currencyapi.com (v3) rate provider.

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

const PROVIDER_ID: &str = "CURRENCY_API";
const BASE_URL: &str = "https://api.currencyapi.com/v3/latest";

#[derive(Debug, Deserialize)]
struct Meta {
    last_updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrencyValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    meta: Option<Meta>,
    data: HashMap<String, CurrencyValue>,
}

pub struct CurrencyApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CurrencyApiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn parse_latest(body: &str, requested_base: &str) -> Result<RateTable, MarketDataError> {
    let response: LatestResponse = parse_json(PROVIDER_ID, body)?;
    let date = response.meta.and_then(|m| m.last_updated_at);
    let rates = response
        .data
        .into_iter()
        .map(|(code, v)| (code, v.value))
        .collect();
    rate_table(PROVIDER_ID, requested_base, requested_base, date.as_deref(), rates)
}

#[async_trait]
impl ProviderAdapter<RateRequest, RateTable> for CurrencyApiProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        6
    }

    async fn fetch(&self, request: &RateRequest) -> Result<RateTable, MarketDataError> {
        let body = get_text(
            &self.client,
            PROVIDER_ID,
            &self.base_url,
            &[
                ("apikey", self.api_key.as_str()),
                ("base_currency", request.base.as_str()),
            ],
        )
        .await?;
        parse_latest(&body, &request.base)
    }
}
