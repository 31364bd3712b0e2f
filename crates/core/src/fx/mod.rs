//! FX module - rate reconciliation, cross rates and arbitrage analytics.

pub mod arbitrage;
mod currency_converter;
mod fx_model;
mod fx_service;
mod fx_traits;
pub mod insights;
mod market_metrics;

pub use arbitrage::{
    calculate_arbitrage, calculate_threshold_arbitrage, check_thresholds, ArbitrageResult,
    ConversionChain, CurrencySelection, Leg, LegRates, ThresholdReadiness, TradingThresholds,
    NONE_SENTINEL,
};
pub use currency_converter::CurrencyConverter;
pub use fx_model::{ArbitrageReport, ArbitrageRequest, RatesSnapshot};
pub use fx_service::FxService;
pub use fx_traits::FxServiceTrait;
pub use insights::{realistic_gains, ApyGains, ArbitrageTables, PredictionModel, RealisticGains};
pub use market_metrics::{MajorBand, MarketMetrics, MarketMetricsConfig, MarketTrend};
