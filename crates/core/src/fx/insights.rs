//! Opportunity estimates for an arbitrage path.
//!
//! These are heuristics layered on the live arbitrage result: how often a
//! path tends to open up, scaled by how volatile its currencies are and by
//! the market trend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::arbitrage::ConversionChain;
use super::market_metrics::MarketTrend;

/// Reference tables for opportunity estimates.
#[derive(Clone, Debug)]
pub struct ArbitrageTables {
    /// Typical daily volatility per currency
    pub volatility: HashMap<String, f64>,
    pub default_volatility: f64,
    /// Daily opportunity rate per currency pair, keyed "FROM-TO"
    pub opportunity: HashMap<String, f64>,
    /// Pair used when neither orientation of a pair is listed
    pub fallback_pair: String,
    pub two_leg_default: f64,
    pub three_leg_default: f64,
    /// Three-leg paths need all legs aligned, so they open up less often
    pub three_leg_discount: f64,
    /// Savings APY per currency, in percent
    pub savings_apy: HashMap<String, f64>,
    pub monthly_opportunities: f64,
    pub yearly_opportunities: f64,
    /// Average hold time in days
    pub two_leg_hold_days: f64,
    pub three_leg_hold_days: f64,
}

fn table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

impl Default for ArbitrageTables {
    fn default() -> Self {
        Self {
            volatility: table(&[
                ("USD", 0.008),
                ("MXN", 0.025),
                ("GBP", 0.012),
                ("EUR", 0.010),
                ("JPY", 0.014),
                ("CAD", 0.011),
                ("AUD", 0.018),
                ("CHF", 0.009),
                ("CNY", 0.008),
                ("INR", 0.022),
                ("BRL", 0.035),
                ("KRW", 0.028),
                ("SGD", 0.008),
                ("HKD", 0.003),
                ("NOK", 0.016),
                ("SEK", 0.015),
                ("DKK", 0.010),
                ("PLN", 0.020),
                ("CZK", 0.018),
                ("HUF", 0.025),
            ]),
            default_volatility: 0.015,
            opportunity: table(&[
                ("USD-MXN", 0.12),
                ("USD-GBP", 0.08),
                ("USD-EUR", 0.07),
                ("USD-JPY", 0.09),
                ("USD-CAD", 0.06),
                ("USD-AUD", 0.11),
                ("USD-CHF", 0.05),
                ("USD-CNY", 0.04),
                ("USD-INR", 0.15),
                ("USD-BRL", 0.18),
                ("USD-KRW", 0.14),
                ("USD-SGD", 0.04),
                ("USD-HKD", 0.02),
                ("USD-NOK", 0.10),
                ("USD-SEK", 0.09),
                ("USD-DKK", 0.06),
                ("USD-PLN", 0.13),
                ("USD-CZK", 0.12),
                ("USD-HUF", 0.16),
                ("MXN-GBP", 0.14),
                ("MXN-EUR", 0.13),
                ("GBP-EUR", 0.08),
                ("EUR-JPY", 0.10),
                ("GBP-JPY", 0.11),
                ("AUD-JPY", 0.13),
                ("CAD-JPY", 0.10),
                ("CHF-JPY", 0.09),
                ("JPY-EUR", 0.10),
                ("JPY-GBP", 0.11),
                ("EUR-GBP", 0.08),
            ]),
            fallback_pair: "USD-EUR".to_string(),
            two_leg_default: 0.10,
            three_leg_default: 0.08,
            three_leg_discount: 0.75,
            savings_apy: table(&[("USD", 3.92), ("GBP", 2.62), ("EUR", 1.00)]),
            monthly_opportunities: 1.4,
            yearly_opportunities: 16.8,
            two_leg_hold_days: 1.5,
            three_leg_hold_days: 2.8,
        }
    }
}

impl ArbitrageTables {
    /// Mean volatility of the distinct currencies on the path.
    pub fn combined_volatility(&self, chain: &ConversionChain) -> f64 {
        let currencies = chain.currencies();
        if currencies.is_empty() {
            return self.default_volatility;
        }
        let total: f64 = currencies
            .iter()
            .map(|c| {
                self.volatility
                    .get(c)
                    .copied()
                    .unwrap_or(self.default_volatility)
            })
            .sum();
        total / currencies.len() as f64
    }

    /// Opportunity rate for a pair in either orientation, else the fallback pair.
    fn pair_rate(&self, from: &str, to: &str) -> Option<f64> {
        self.opportunity
            .get(&format!("{}-{}", from, to))
            .or_else(|| self.opportunity.get(&format!("{}-{}", to, from)))
            .or_else(|| self.opportunity.get(&self.fallback_pair))
            .copied()
    }

    /// Daily opportunity rate before volatility and trend scaling.
    pub fn opportunity_rate(&self, chain: &ConversionChain) -> f64 {
        match chain {
            ConversionChain::TwoLeg { leg } => self
                .pair_rate(&leg.from, &leg.to)
                .unwrap_or(self.two_leg_default),
            ConversionChain::ThreeLeg {
                first,
                second,
                third,
            } => {
                let sum: f64 = [first, second, third]
                    .iter()
                    .map(|leg| {
                        self.pair_rate(&leg.from, &leg.to)
                            .unwrap_or(self.three_leg_default)
                    })
                    .sum();
                sum / 3.0 * self.three_leg_discount
            }
        }
    }

    /// Yearly interest on `amount` held in a savings account in `currency`.
    pub fn apy_gains(&self, amount: f64, currency: &str) -> ApyGains {
        let apy_rate = self
            .savings_apy
            .get(&currency.to_ascii_uppercase())
            .copied()
            .unwrap_or(0.0);
        ApyGains {
            currency: currency.to_ascii_uppercase(),
            apy_rate,
            yearly_gain: amount * apy_rate / 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionModel {
    pub daily_opportunity_rate: f64,
    pub monthly_opportunities: f64,
    pub yearly_opportunities: f64,
    /// Days
    pub average_hold_time: f64,
    pub volatility_factor: f64,
}

impl PredictionModel {
    pub fn build(chain: &ConversionChain, tables: &ArbitrageTables, trend: MarketTrend) -> Self {
        let volatility = tables.combined_volatility(chain);
        let base = tables.opportunity_rate(chain);
        let volatility_factor = (1.0 + volatility * 10.0) * trend.multiplier();
        Self {
            daily_opportunity_rate: base * volatility_factor,
            monthly_opportunities: tables.monthly_opportunities,
            yearly_opportunities: tables.yearly_opportunities,
            average_hold_time: if chain.is_two_leg() {
                tables.two_leg_hold_days
            } else {
                tables.three_leg_hold_days
            },
            volatility_factor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealisticGains {
    pub daily: f64,
    pub monthly: f64,
    pub yearly: f64,
}

/// Expected gains if `profit` were captured as often as the path opens up.
pub fn realistic_gains(
    profit: f64,
    chain: &ConversionChain,
    tables: &ArbitrageTables,
    trend: MarketTrend,
    model: &PredictionModel,
) -> RealisticGains {
    let base = tables.opportunity_rate(chain);
    let volatility = tables.combined_volatility(chain);
    let daily = profit.abs() * base * trend.multiplier() * (1.0 + volatility * 5.0);
    RealisticGains {
        daily,
        monthly: daily * model.monthly_opportunities,
        yearly: daily * model.yearly_opportunities,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApyGains {
    pub currency: String,
    /// Percent
    pub apy_rate: f64,
    pub yearly_gain: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::arbitrage::CurrencySelection;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn three_leg() -> ConversionChain {
        CurrencySelection {
            from1: "USD".into(),
            to1: "MXN".into(),
            from2: None,
            to2: Some("GBP".into()),
            from3: None,
            to3: Some("USD".into()),
        }
        .into_chain()
        .unwrap()
    }

    #[test]
    fn test_combined_volatility_two_leg() {
        let tables = ArbitrageTables::default();
        let chain = CurrencySelection::two_leg("USD", "MXN").into_chain().unwrap();
        assert!(close(tables.combined_volatility(&chain), (0.008 + 0.025) / 2.0));
    }

    #[test]
    fn test_combined_volatility_counts_each_currency_once() {
        let tables = ArbitrageTables::default();
        // USD, MXN, GBP (the closing USD is not counted twice)
        assert!(close(
            tables.combined_volatility(&three_leg()),
            (0.008 + 0.025 + 0.012) / 3.0
        ));
    }

    #[test]
    fn test_opportunity_rate_pair_lookup() {
        let tables = ArbitrageTables::default();
        let direct = CurrencySelection::two_leg("USD", "MXN").into_chain().unwrap();
        assert!(close(tables.opportunity_rate(&direct), 0.12));

        let reversed = CurrencySelection::two_leg("EUR", "USD").into_chain().unwrap();
        assert!(close(tables.opportunity_rate(&reversed), 0.07));

        // unlisted pair falls back to USD-EUR
        let unknown = CurrencySelection::two_leg("HUF", "KRW").into_chain().unwrap();
        assert!(close(tables.opportunity_rate(&unknown), 0.07));
    }

    #[test]
    fn test_opportunity_rate_three_leg() {
        let tables = ArbitrageTables::default();
        // USD-MXN 0.12, MXN-GBP 0.14, GBP-USD via USD-GBP 0.08
        let expected = (0.12 + 0.14 + 0.08) / 3.0 * 0.75;
        assert!(close(tables.opportunity_rate(&three_leg()), expected));
    }

    #[test]
    fn test_prediction_model() {
        let tables = ArbitrageTables::default();
        let chain = CurrencySelection::two_leg("USD", "MXN").into_chain().unwrap();
        let model = PredictionModel::build(&chain, &tables, MarketTrend::Bullish);

        let volatility_factor = (1.0 + 0.0165 * 10.0) * 1.2;
        assert!(close(model.volatility_factor, volatility_factor));
        assert!(close(model.daily_opportunity_rate, 0.12 * volatility_factor));
        assert_eq!(model.average_hold_time, 1.5);
        assert_eq!(model.yearly_opportunities, 16.8);

        let model = PredictionModel::build(&three_leg(), &tables, MarketTrend::Neutral);
        assert_eq!(model.average_hold_time, 2.8);
    }

    #[test]
    fn test_realistic_gains() {
        let tables = ArbitrageTables::default();
        let chain = CurrencySelection::two_leg("USD", "MXN").into_chain().unwrap();
        let model = PredictionModel::build(&chain, &tables, MarketTrend::Bearish);
        let gains = realistic_gains(-10.0, &chain, &tables, MarketTrend::Bearish, &model);

        let daily = 10.0 * 0.12 * 0.8 * (1.0 + 0.0165 * 5.0);
        assert!(close(gains.daily, daily));
        assert!(close(gains.monthly, daily * 1.4));
        assert!(close(gains.yearly, daily * 16.8));
    }

    #[test]
    fn test_apy_gains() {
        let tables = ArbitrageTables::default();
        let usd = tables.apy_gains(10_000.0, "usd");
        assert_eq!(usd.apy_rate, 3.92);
        assert!(close(usd.yearly_gain, 392.0));

        let jpy = tables.apy_gains(10_000.0, "JPY");
        assert_eq!(jpy.apy_rate, 0.0);
        assert_eq!(jpy.yearly_gain, 0.0);
    }
}
