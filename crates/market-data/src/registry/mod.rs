//! Fallback chains for market data providers.
//!
//! This module contains:
//! - [`ProviderChain`]: sequential-first-success and settle-all runners
//! - [`FallbackPolicy`] / [`ChainOutcome`]: what happens when a chain comes up empty
//! - [`FetchDiagnostics`]: per-attempt records for logging

mod diagnostics;
mod policy;
mod provider_chain;

pub use diagnostics::{FetchDiagnostics, ProviderAttempt};
pub use policy::{ChainOutcome, FallbackPolicy, SYNTHETIC_SOURCE};
pub use provider_chain::ProviderChain;
