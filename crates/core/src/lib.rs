//! Live Tools Core - services and derived metrics.
//!
//! This crate sits on top of `livetools-market-data`: it runs the provider
//! chains for each data class, reconciles what comes back, applies the
//! configured fallback policy and turns the result into the numbers the
//! widgets display (arbitrage paths, DCA projections, ETF health, news
//! sentiment).

pub mod constants;
pub mod errors;
pub mod etf;
pub mod fx;
pub mod news;
pub mod projections;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
pub use errors::ValidationError;
