use async_trait::async_trait;

use super::fx_model::{ArbitrageReport, ArbitrageRequest, RatesSnapshot};
use crate::errors::Result;

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Latest rates relative to `base`, merged across every provider that
    /// answered.
    async fn get_latest_rates(&self, base: &str) -> Result<RatesSnapshot>;

    /// Evaluate an arbitrage path against the latest USD rates.
    async fn analyze_arbitrage(&self, request: &ArbitrageRequest) -> Result<ArbitrageReport>;
}
