//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all provider and chain operations
//! - [`RetryClass`]: Classification used by the chain runner for diagnostics

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Errors that can occur while fetching from providers or running a chain.
///
/// Provider adapters distinguish HTTP-status failures ([`HttpStatus`](Self::HttpStatus),
/// [`RateLimited`](Self::RateLimited)) from payloads that arrived but could not be
/// understood ([`MalformedPayload`](Self::MalformedPayload)).
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The call did not complete within the chain's timeout.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The provider rate limited the request (HTTP 429 or an in-body notice).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The provider answered but the body did not have the expected shape.
    #[error("Malformed payload from {provider}: {message}")]
    MalformedPayload {
        /// The provider that returned the payload
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// A provider-specific error reported inside an otherwise valid response.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The request was rejected before any provider was called.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The chain has no providers configured.
    #[error("No providers available")]
    NoProvidersAvailable,

    /// Every provider in the chain was tried and none succeeded.
    #[error("All providers failed ({attempted} attempted)")]
    AllProvidersFailed {
        /// Number of providers that were tried
        attempted: usize,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use livetools_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::Timeout { provider: "FRANKFURTER".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Transient);
    ///
    /// let error = MarketDataError::InvalidRequest("bad base".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Terminal);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Timeout { .. } | Self::RateLimited { .. } => RetryClass::Transient,

            Self::HttpStatus { .. }
            | Self::MalformedPayload { .. }
            | Self::ProviderError { .. }
            | Self::SymbolNotFound(_)
            | Self::Network(_) => RetryClass::NextProvider,

            Self::InvalidRequest(_)
            | Self::NoProvidersAvailable
            | Self::AllProvidersFailed { .. } => RetryClass::Terminal,
        }
    }

    /// True when the chain as a whole came back empty-handed.
    ///
    /// These are the only errors a synthesizing fallback policy replaces.
    pub fn is_chain_exhausted(&self) -> bool {
        matches!(
            self,
            Self::AllProvidersFailed { .. } | Self::NoProvidersAvailable
        )
    }

    /// Shorthand used by adapters when a JSON body does not parse.
    pub fn malformed(provider: &str, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
