use livetools_core::{
    constants::{DEFAULT_BASE_CURRENCY, DEFAULT_ETF_SYMBOLS},
    fx::{ArbitrageRequest, CurrencySelection, TradingThresholds},
    projections::{DcaInput, MarketConditions, PaymentFrequency, PortfolioRequest},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RatesQuery {
    pub base: Option<String>,
}

impl RatesQuery {
    pub fn base(&self) -> &str {
        self.base
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BASE_CURRENCY)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SymbolsQuery {
    pub symbols: Option<String>,
}

impl SymbolsQuery {
    /// Comma-separated `symbols`, or the default watch list.
    pub fn symbols(&self) -> Vec<String> {
        match self.symbols.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.split(',').map(|s| s.to_string()).collect(),
            _ => DEFAULT_ETF_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthQuery {
    pub symbols: Option<String>,
    /// Market regime in [-0.5, 0.5]; derived from the current week when absent
    pub regime: Option<f64>,
}

/// Flat query string of the arbitrage calculator.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageQuery {
    pub amount: f64,
    pub from1: String,
    pub to1: String,
    pub from2: Option<String>,
    pub to2: Option<String>,
    pub from3: Option<String>,
    pub to3: Option<String>,
    pub first_threshold: Option<f64>,
    pub second_threshold: Option<f64>,
    pub third_threshold: Option<f64>,
    pub apy_currency: Option<String>,
}

impl From<ArbitrageQuery> for ArbitrageRequest {
    fn from(q: ArbitrageQuery) -> Self {
        let thresholds = if q.first_threshold.is_some()
            || q.second_threshold.is_some()
            || q.third_threshold.is_some()
        {
            let defaults = TradingThresholds::default();
            Some(TradingThresholds {
                first_threshold: q.first_threshold.unwrap_or(defaults.first_threshold),
                second_threshold: q.second_threshold.unwrap_or(defaults.second_threshold),
                third_threshold: q.third_threshold.unwrap_or(defaults.third_threshold),
            })
        } else {
            None
        };
        ArbitrageRequest {
            amount: q.amount,
            selection: CurrencySelection {
                from1: q.from1,
                to1: q.to1,
                from2: q.from2,
                to2: q.to2,
                from3: q.from3,
                to3: q.to3,
            },
            thresholds,
            apy_currency: q.apy_currency,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionBody {
    #[serde(flatten)]
    pub request: PortfolioRequest,
    /// Macro backdrop; the seasonal default for today when absent
    pub conditions: Option<MarketConditions>,
}

/// Inputs of the standalone DCA calculator. Rates are monthly fractions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaQuery {
    pub payment: f64,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    pub months: u32,
    #[serde(default)]
    pub monthly_return: f64,
    #[serde(default)]
    pub monthly_volatility: f64,
}

impl From<DcaQuery> for DcaInput {
    fn from(q: DcaQuery) -> Self {
        DcaInput {
            payment: q.payment,
            frequency: q.frequency,
            months: q.months,
            monthly_return: q.monthly_return,
            monthly_volatility: q.monthly_volatility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_default() {
        assert_eq!(SymbolsQuery::default().symbols().len(), 5);
        let q = SymbolsQuery {
            symbols: Some("VTI, qqq".into()),
        };
        assert_eq!(q.symbols(), vec!["VTI".to_string(), " qqq".to_string()]);
    }

    #[test]
    fn test_base_default() {
        assert_eq!(RatesQuery::default().base(), "USD");
        let q = RatesQuery {
            base: Some(" eur ".into()),
        };
        assert_eq!(q.base(), "eur");
    }

    #[test]
    fn test_thresholds_filled_from_defaults() {
        let request: ArbitrageRequest = ArbitrageQuery {
            amount: 1000.0,
            from1: "USD".into(),
            to1: "MXN".into(),
            from2: None,
            to2: None,
            from3: Some("None".into()),
            to3: None,
            first_threshold: Some(19.5),
            second_threshold: None,
            third_threshold: None,
            apy_currency: None,
        }
        .into();
        let thresholds = request.thresholds.unwrap();
        assert_eq!(thresholds.first_threshold, 19.5);
        assert_eq!(thresholds.second_threshold, TradingThresholds::default().second_threshold);
    }
}
