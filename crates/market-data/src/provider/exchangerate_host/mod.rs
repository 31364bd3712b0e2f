//! exchangerate.host rate provider.

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

const PROVIDER_ID: &str = "EXCHANGERATE_HOST";
const BASE_URL: &str = "https://api.exchangerate.host/latest";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
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

/// Rates from `api.exchangerate.host`.
pub struct ExchangeRateHostProvider {
    client: Client,
    base_url: String,
}

impl ExchangeRateHostProvider {
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

impl Default for ExchangeRateHostProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_latest(body: &str, requested_base: &str) -> Result<RateTable, MarketDataError> {
    let response: LatestResponse = parse_json(PROVIDER_ID, body)?;

    if response.success == Some(false) {
        let message = response
            .error
            .and_then(|e| e.info.or(e.kind))
            .unwrap_or_else(|| "Request unsuccessful".to_string());
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        });
    }

    let rates = response
        .rates
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "Missing rates"))?;
    let base = response.base.unwrap_or_else(|| requested_base.to_string());
    rate_table(PROVIDER_ID, requested_base, &base, response.date.as_deref(), rates)
}

#[async_trait]
impl ProviderAdapter<RateRequest, RateTable> for ExchangeRateHostProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    async fn fetch(&self, request: &RateRequest) -> Result<RateTable, MarketDataError> {
        let body = get_text(
            &self.client,
            PROVIDER_ID,
            &self.base_url,
            &[("base", request.base.as_str())],
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
        let body = r#"{"success":true,"base":"USD","date":"2024-05-02","rates":{"EUR":0.935,"CAD":1.37}}"#;
        let table = parse_latest(body, "USD").unwrap();
        assert_eq!(table.rate("CAD"), Some(1.37));
    }

    #[test]
    fn test_error_body_is_provider_error() {
        let body = r#"{"success":false,"error":{"code":101,"type":"missing_access_key","info":"You have not supplied an API Access Key."}}"#;
        let err = parse_latest(body, "USD").unwrap_err();
        match err {
            MarketDataError::ProviderError { message, .. } => {
                assert!(message.contains("Access Key"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
