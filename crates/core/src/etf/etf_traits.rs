use async_trait::async_trait;

use super::etf_model::{EtfDataSet, EtfHealthReport};
use crate::errors::Result;
use crate::projections::{MarketConditions, PortfolioPredictions, PortfolioRequest};

/// Trait defining the contract for ETF service operations.
#[async_trait]
pub trait EtfServiceTrait: Send + Sync {
    /// Quotes and price history for `symbols`, fetched concurrently.
    async fn get_etf_data(&self, symbols: &[String]) -> Result<EtfDataSet>;

    /// Health outlook for `symbols`. `market_regime` lies in [-0.5, 0.5].
    async fn predict_health(&self, symbols: &[String], market_regime: f64) -> Result<EtfHealthReport>;

    /// Gain projections for an allocation, using live statistics of its ETFs.
    async fn project_portfolio(
        &self,
        request: &PortfolioRequest,
        conditions: &MarketConditions,
    ) -> Result<PortfolioPredictions>;
}
