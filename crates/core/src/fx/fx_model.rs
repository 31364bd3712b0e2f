use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use livetools_market_data::{MarketBias, Provenance, RateTable};
use serde::{Deserialize, Serialize};

use super::arbitrage::{
    ArbitrageResult, ConversionChain, CurrencySelection, LegRates, ThresholdReadiness,
    TradingThresholds,
};
use super::insights::{ApyGains, PredictionModel, RealisticGains};
use super::market_metrics::MarketMetrics;

/// Reconciled exchange rates for one base currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesSnapshot {
    pub base: String,
    pub date: NaiveDate,
    pub rates: BTreeMap<String, f64>,
    pub provenance: Provenance,
    /// Providers whose tables went into the median
    pub sources: Vec<String>,
    pub sources_attempted: usize,
    pub sources_succeeded: usize,
    /// Only set on synthesized rates
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sentiment: Option<MarketBias>,
    pub timestamp: DateTime<Utc>,
}

impl RatesSnapshot {
    /// The snapshot as a rate table, for cross-rate lookups.
    pub fn to_table(&self) -> RateTable {
        RateTable::new(
            self.base.clone(),
            self.date,
            self.sources.join("+"),
            self.rates.iter().map(|(c, r)| (c.clone(), *r)),
        )
    }
}

/// Inputs of an arbitrage analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageRequest {
    pub amount: f64,
    #[serde(flatten)]
    pub selection: CurrencySelection,
    #[serde(default)]
    pub thresholds: Option<TradingThresholds>,
    /// Currency whose savings APY is reported alongside; defaults to `from1`
    #[serde(default)]
    pub apy_currency: Option<String>,
}

/// Everything the arbitrage calculator displays for one path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageReport {
    pub chain: ConversionChain,
    pub rates: LegRates,
    pub result: ArbitrageResult,
    pub gains: RealisticGains,
    pub thresholds: TradingThresholds,
    pub threshold_result: ArbitrageResult,
    pub threshold_gains: RealisticGains,
    pub readiness: ThresholdReadiness,
    pub prediction: PredictionModel,
    pub market: MarketMetrics,
    pub apy: ApyGains,
    pub provenance: Provenance,
    pub timestamp: DateTime<Utc>,
}
