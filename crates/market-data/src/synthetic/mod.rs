//! Placeholder data for chains whose policy is to synthesize.
//!
//! Generators take an explicit [`rand::Rng`] so tests can seed them. Every
//! value produced here is tagged with the `SYNTHETIC` source id; callers
//! disclose it through [`Provenance::Synthesized`](crate::models::Provenance).

mod quotes;
mod rates;

pub use quotes::{SyntheticHistory, SyntheticQuotes};
pub use rates::{MarketBias, RateSeed, SyntheticRateSet, SyntheticRates};
