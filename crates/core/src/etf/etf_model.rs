use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use livetools_market_data::{PricePoint, Provenance, Quote};
use serde::{Deserialize, Serialize};

use super::analytics::HealthPrediction;

/// Quote plus recent closes for one symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfSnapshot {
    pub name: String,
    #[serde(flatten)]
    pub quote: Quote,
    pub price_history: Vec<PricePoint>,
    pub provenance: Provenance,
}

/// Snapshots for every symbol that could be served.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfDataSet {
    pub etfs: BTreeMap<String, EtfSnapshot>,
    pub provenance: Provenance,
    /// Requested symbols with no data (all providers failed, fallback refused)
    pub missing: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtfHealthReport {
    pub predictions: Vec<HealthPrediction>,
    pub market_regime: f64,
    pub provenance: Provenance,
    pub missing: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
