//! open.er-api.com rate provider.

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

const PROVIDER_ID: &str = "OPEN_ER_API";
const BASE_URL: &str = "https://open.er-api.com/v6/latest";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    base_code: Option<String>,
    rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

pub struct OpenErApiProvider {
    client: Client,
    base_url: String,
}

impl OpenErApiProvider {
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

impl Default for OpenErApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_latest(body: &str, requested_base: &str) -> Result<RateTable, MarketDataError> {
    let response: LatestResponse = parse_json(PROVIDER_ID, body)?;

    if response.result != "success" {
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: response
                .error_type
                .unwrap_or_else(|| format!("result={}", response.result)),
        });
    }

    let rates = response
        .rates
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "Missing rates"))?;
    let base = response
        .base_code
        .unwrap_or_else(|| requested_base.to_string());
    rate_table(PROVIDER_ID, requested_base, &base, None, rates)
}

#[async_trait]
impl ProviderAdapter<RateRequest, RateTable> for OpenErApiProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        4
    }

    async fn fetch(&self, request: &RateRequest) -> Result<RateTable, MarketDataError> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(&request.base));
        let body = get_text(&self.client, PROVIDER_ID, &url, &[]).await?;
        parse_latest(&body, &request.base)
    }
}
