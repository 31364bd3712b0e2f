use std::f64::consts::PI;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Macro backdrop for portfolio projections. Rates are in percent,
/// volatility and sentiment are fractions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketConditions {
    pub inflation_rate: f64,
    pub fed_rate: f64,
    pub market_volatility: f64,
    pub economic_growth: f64,
    pub market_sentiment: f64,
}

impl Default for MarketConditions {
    fn default() -> Self {
        Self::with_cycle(0.0)
    }
}

impl MarketConditions {
    /// Conditions at a point of a yearly economic cycle, `cycle` in [-0.5, 0.5].
    pub fn with_cycle(cycle: f64) -> Self {
        Self {
            inflation_rate: 2.8 + cycle * 0.5,
            fed_rate: 4.5 + cycle * 0.3,
            market_volatility: 0.18 + cycle.abs() * 0.05,
            economic_growth: 2.2 + cycle * 0.8,
            market_sentiment: 0.1,
        }
    }

    /// Conditions following the yearly cycle for `date`.
    pub fn seasonal(date: NaiveDate) -> Self {
        let day = f64::from(date.ordinal());
        Self::with_cycle((day / 365.0 * 2.0 * PI).sin() * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_cycle() {
        let c = MarketConditions::default();
        assert_eq!(c.inflation_rate, 2.8);
        assert_eq!(c.fed_rate, 4.5);
        assert_eq!(c.market_volatility, 0.18);
        assert_eq!(c.market_sentiment, 0.1);
    }

    #[test]
    fn test_seasonal_stays_in_range() {
        let mut date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for _ in 0..366 {
            let c = MarketConditions::seasonal(date);
            assert!((2.55..=3.05).contains(&c.inflation_rate));
            assert!((0.18..=0.2051).contains(&c.market_volatility));
            date = date.succ_opt().unwrap();
        }
    }
}
