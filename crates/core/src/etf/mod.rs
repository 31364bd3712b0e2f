//! ETF module - quotes with history, health outlook and portfolio inputs.

mod analytics;
mod etf_model;
mod etf_service;
mod etf_traits;
mod reference;

pub use analytics::{
    annualized_volatility, daily_returns, weekly_market_regime, HealthModel, HealthPrediction,
    Recommendation, RiskLevel,
};
pub use etf_model::{EtfDataSet, EtfHealthReport, EtfSnapshot};
pub use etf_service::{normalize_symbols, EtfService};
pub use etf_traits::EtfServiceTrait;
pub use reference::EtfReferenceData;
