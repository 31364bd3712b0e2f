//! Fixer rate provider. The free tier only quotes against EUR, so answers
//! are rebased onto the requested currency.

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

const PROVIDER_ID: &str = "FIXER";
const BASE_URL: &str = "https://api.fixer.io/latest";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    success: Option<bool>,
    base: Option<String>,
    date: Option<String>,
    rates: Option<HashMap<String, f64>>,
    error: Option<ApiErrorBody>,
}

pub struct FixerProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FixerProvider {
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

    if response.success == Some(false) {
        let message = match response.error {
            Some(ApiErrorBody { code, info }) => format!(
                "{} (code {})",
                info.unwrap_or_else(|| "Request unsuccessful".to_string()),
                code.unwrap_or_default()
            ),
            None => "Request unsuccessful".to_string(),
        };
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        });
    }

    let rates = response
        .rates
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "Missing rates"))?;
    let base = response.base.unwrap_or_else(|| "EUR".to_string());
    rate_table(PROVIDER_ID, requested_base, &base, response.date.as_deref(), rates)
}

#[async_trait]
impl ProviderAdapter<RateRequest, RateTable> for FixerProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        5
    }

    async fn fetch(&self, request: &RateRequest) -> Result<RateTable, MarketDataError> {
        let body = get_text(
            &self.client,
            PROVIDER_ID,
            &self.base_url,
            &[
                ("access_key", self.api_key.as_str()),
                ("base", request.base.as_str()),
            ],
        )
        .await?;
        parse_latest(&body, &request.base)
    }
}
