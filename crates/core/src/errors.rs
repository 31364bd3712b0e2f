//! Core error types for the live tools services.
//!
//! Provider and chain failures arrive as [`MarketDataError`] and are wrapped
//! here; everything the services reject on their own is a [`ValidationError`].

use std::num::ParseFloatError;

use livetools_market_data::MarketDataError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the live tools services.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Currency '{0}' is not supported")]
    UnsupportedCurrency(String),

    #[error("No exchange rate available for {0}")]
    MissingRate(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the caller sent something unusable, as opposed to every
    /// upstream source failing.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::UnsupportedCurrency(_) | Error::Validation(_) => true,
            Error::MarketData(e) => matches!(
                e,
                MarketDataError::InvalidRequest(_) | MarketDataError::SymbolNotFound(_)
            ),
            Error::MissingRate(_) | Error::Unexpected(_) => false,
        }
    }
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse number: {0}")]
    NumberParse(#[from] ParseFloatError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(Error::UnsupportedCurrency("XYZ".into()).is_client_error());
        assert!(Error::from(ValidationError::MissingField("symbols".into())).is_client_error());
        assert!(Error::from(MarketDataError::InvalidRequest("base".into())).is_client_error());
        assert!(!Error::from(MarketDataError::AllProvidersFailed { attempted: 4 }).is_client_error());
    }
}
