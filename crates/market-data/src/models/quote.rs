use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::types::round2;

/// Request for the latest quote of one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteRequest {
    pub symbol: String,
}

impl QuoteRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

/// Request for a window of daily closes ending today.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: String,
    pub days: u32,
}

/// Latest quote for an ETF, normalised across providers.
///
/// Produced by exactly one adapter call. Price fields are rounded to cents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub beta: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub avg_volume: u64,
    /// Source of the quote (YAHOO, ALPHA_VANTAGE, FMP, SYNTHETIC)
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

/// Values used when a provider does not report a field.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteDefaults {
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub beta: f64,
    /// 52-week high as a multiple of the current price
    pub high_multiple: f64,
    /// 52-week low as a multiple of the current price
    pub low_multiple: f64,
    pub volume: u64,
}

impl Default for QuoteDefaults {
    fn default() -> Self {
        Self {
            pe_ratio: 18.5,
            dividend_yield: 1.8,
            beta: 1.0,
            high_multiple: 1.15,
            low_multiple: 0.85,
            volume: 1_000_000,
        }
    }
}

impl Quote {
    /// Build a quote from the three fields every provider reports, filling the
    /// rest from `defaults`.
    pub fn from_price(
        symbol: impl Into<String>,
        price: f64,
        change: f64,
        change_percent: f64,
        source: impl Into<String>,
        defaults: &QuoteDefaults,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price: round2(price),
            change: round2(change),
            change_percent: round2(change_percent),
            volume: defaults.volume,
            market_cap: 0.0,
            pe_ratio: defaults.pe_ratio,
            dividend_yield: defaults.dividend_yield,
            beta: defaults.beta,
            fifty_two_week_high: round2(price * defaults.high_multiple),
            fifty_two_week_low: round2(price * defaults.low_multiple),
            avg_volume: defaults.volume,
            source: source.into(),
            timestamp: Utc::now(),
        }
    }

    /// Position of the price inside its 52-week range, 0.0 at the low and
    /// 1.0 at the high. A degenerate range reports the midpoint.
    pub fn range_position(&self) -> f64 {
        let span = self.fifty_two_week_high - self.fifty_two_week_low;
        if span <= 0.0 {
            return 0.5;
        }
        (self.price - self.fifty_two_week_low) / span
    }
}

/// Daily closing price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close: round2(close),
        }
    }
}
