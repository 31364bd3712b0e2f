//! Shared HTTP plumbing for the adapters.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::MarketDataError;

/// Client-level timeout used when an adapter is built without one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

const USER_AGENT: &str = "Mozilla/5.0 (compatible; livetools/0.4)";

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET `url` and return the body as text.
///
/// Maps transport timeouts to [`MarketDataError::Timeout`], HTTP 429 to
/// [`MarketDataError::RateLimited`] and any other non-success status to
/// [`MarketDataError::HttpStatus`].
pub(crate) async fn get_text(
    client: &Client,
    provider: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, MarketDataError> {
    debug!("{}: GET {}", provider, url);

    let response = client.get(url).query(query).send().await.map_err(|e| {
        if e.is_timeout() {
            MarketDataError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            MarketDataError::ProviderError {
                provider: provider.to_string(),
                message: format!("Request failed: {}", e),
            }
        }
    })?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("{}: rate limited", provider);
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }
    if !status.is_success() {
        warn!("{}: HTTP {}", provider, status.as_u16());
        return Err(MarketDataError::HttpStatus {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| {
        if e.is_timeout() {
            MarketDataError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            MarketDataError::malformed(provider, format!("Failed to read body: {}", e))
        }
    })
}

/// Deserialize a JSON body, mapping parse failures to a malformed payload.
pub(crate) fn parse_json<T: DeserializeOwned>(provider: &str, body: &str) -> Result<T, MarketDataError> {
    serde_json::from_str(body)
        .map_err(|e| MarketDataError::malformed(provider, format!("Failed to parse response: {}", e)))
}

/// GET and deserialize JSON in one step.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, MarketDataError> {
    let body = get_text(client, provider, url, query).await?;
    parse_json(provider, &body)
}
