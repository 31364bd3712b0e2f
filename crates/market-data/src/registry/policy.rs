//! Per-data-class fallback policy and the outcome type chains return.

use std::str::FromStr;

use log::warn;

use crate::errors::MarketDataError;
use crate::models::{DataClass, Provenance};

/// Source id recorded on synthesized outcomes.
pub const SYNTHETIC_SOURCE: &str = "SYNTHETIC";

/// What a chain does when every provider failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FallbackPolicy {
    /// Surface [`MarketDataError::AllProvidersFailed`] to the caller.
    Refuse,
    /// Generate placeholder data flagged [`Provenance::Synthesized`].
    Synthesize,
}

impl FallbackPolicy {
    /// Default policy for each data class: quotes synthesize, rates and
    /// news refuse.
    pub fn default_for(data_class: DataClass) -> Self {
        match data_class {
            DataClass::EtfQuotes => FallbackPolicy::Synthesize,
            DataClass::FxRates | DataClass::News => FallbackPolicy::Refuse,
        }
    }

    /// Apply the policy to a chain result.
    ///
    /// Successful results pass through untouched. Only an exhausted chain is
    /// replaced by synthesized data; other errors (e.g. an invalid request)
    /// always propagate.
    pub fn recover<T, F>(
        self,
        data_class: DataClass,
        result: Result<ChainOutcome<T>, MarketDataError>,
        synthesize: F,
    ) -> Result<ChainOutcome<T>, MarketDataError>
    where
        F: FnOnce() -> T,
    {
        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_chain_exhausted() && self == FallbackPolicy::Synthesize => {
                let attempted = match &e {
                    MarketDataError::AllProvidersFailed { attempted } => *attempted,
                    _ => 0,
                };
                warn!(
                    "{}: all providers failed ({}), serving synthesized data",
                    data_class, e
                );
                Ok(ChainOutcome {
                    value: synthesize(),
                    provenance: Provenance::Synthesized,
                    sources: vec![SYNTHETIC_SOURCE.to_string()],
                    attempted,
                })
            }
            Err(e) => Err(e),
        }
    }
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refuse" | "fail" => Ok(FallbackPolicy::Refuse),
            "synthesize" | "synthesise" | "fallback" => Ok(FallbackPolicy::Synthesize),
            other => Err(format!(
                "unknown fallback policy '{}', expected 'refuse' or 'synthesize'",
                other
            )),
        }
    }
}

/// Successful result of a chain run.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainOutcome<T> {
    pub value: T,
    pub provenance: Provenance,
    /// Providers whose output is in `value`.
    pub sources: Vec<String>,
    /// Providers that were tried.
    pub attempted: usize,
}

impl<T> ChainOutcome<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ChainOutcome<U> {
        ChainOutcome {
            value: f(self.value),
            provenance: self.provenance,
            sources: self.sources,
            attempted: self.attempted,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        self.provenance.is_synthesized()
    }
}
