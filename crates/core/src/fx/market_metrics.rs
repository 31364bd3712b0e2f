use serde::{Deserialize, Serialize};

use super::currency_converter::CurrencyConverter;

/// Direction of the FX market as read from the major currencies.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketTrend {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl MarketTrend {
    /// Scaling applied to opportunity estimates.
    pub fn multiplier(&self) -> f64 {
        match self {
            MarketTrend::Bullish => 1.2,
            MarketTrend::Bearish => 0.8,
            MarketTrend::Neutral => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketTrend::Bullish => "bullish",
            MarketTrend::Bearish => "bearish",
            MarketTrend::Neutral => "neutral",
        }
    }
}

/// Typical USD range of a major currency.
#[derive(Clone, Debug, PartialEq)]
pub struct MajorBand {
    pub currency: String,
    pub low: f64,
    pub high: f64,
}

impl MajorBand {
    fn new(currency: &str, low: f64, high: f64) -> Self {
        Self {
            currency: currency.to_string(),
            low,
            high,
        }
    }

    pub fn mid(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMetrics {
    /// 0.0 (calm) to 1.0 (every major far from its band)
    pub volatility_index: f64,
    pub trend: MarketTrend,
}

#[derive(Clone, Debug)]
pub struct MarketMetricsConfig {
    pub bands: Vec<MajorBand>,
    /// Trend contribution of one currency above or below its mid-band
    pub trend_step: f64,
    /// Net trend beyond which the market counts as bullish or bearish
    pub trend_threshold: f64,
    /// Scale from mean relative deviation to the volatility index
    pub deviation_scale: f64,
}

impl Default for MarketMetricsConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                MajorBand::new("EUR", 0.85, 0.95),
                MajorBand::new("GBP", 0.70, 0.80),
                MajorBand::new("JPY", 140.0, 160.0),
                MajorBand::new("CAD", 1.25, 1.40),
                MajorBand::new("AUD", 1.45, 1.60),
            ],
            trend_step: 0.1,
            trend_threshold: 0.2,
            deviation_scale: 10.0,
        }
    }
}

impl MarketMetricsConfig {
    /// Volatility index and trend from USD rates of the major currencies.
    ///
    /// Currencies missing from the table contribute nothing, but still count
    /// in the average.
    pub fn compute(&self, converter: &CurrencyConverter<'_>) -> MarketMetrics {
        if self.bands.is_empty() {
            return MarketMetrics {
                volatility_index: 0.0,
                trend: MarketTrend::Neutral,
            };
        }

        let mut total_deviation = 0.0;
        let mut trend = 0.0;
        for band in &self.bands {
            let Ok(rate) = converter.rate("USD", &band.currency) else {
                continue;
            };
            let mid = band.mid();
            total_deviation += (rate - mid).abs() / mid;
            trend += if rate > mid {
                self.trend_step
            } else {
                -self.trend_step
            };
        }

        let average = total_deviation / self.bands.len() as f64;
        let trend = if trend > self.trend_threshold {
            MarketTrend::Bullish
        } else if trend < -self.trend_threshold {
            MarketTrend::Bearish
        } else {
            MarketTrend::Neutral
        };

        MarketMetrics {
            volatility_index: (average * self.deviation_scale).min(1.0),
            trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livetools_market_data::RateTable;

    fn table(entries: &[(&str, f64)]) -> RateTable {
        RateTable::today(
            "USD",
            "TEST",
            entries.iter().map(|(c, r)| (c.to_string(), *r)).collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_rates_at_mid_band_are_calm() {
        let rates = table(&[
            ("EUR", 0.90),
            ("GBP", 0.75),
            ("JPY", 150.0),
            ("CAD", 1.325),
            ("AUD", 1.525),
        ]);
        let metrics = MarketMetricsConfig::default().compute(&CurrencyConverter::new(&rates));
        assert!(metrics.volatility_index.abs() < 1e-9);
    }

    #[test]
    fn test_weak_dollar_is_bearish() {
        let rates = table(&[
            ("EUR", 0.84),
            ("GBP", 0.69),
            ("JPY", 139.0),
            ("CAD", 1.24),
            ("AUD", 1.44),
        ]);
        let metrics = MarketMetricsConfig::default().compute(&CurrencyConverter::new(&rates));
        assert_eq!(metrics.trend, MarketTrend::Bearish);
    }

    #[test]
    fn test_strong_dollar_is_bullish() {
        let rates = table(&[
            ("EUR", 0.96),
            ("GBP", 0.81),
            ("JPY", 161.0),
            ("CAD", 1.41),
            ("AUD", 1.61),
        ]);
        let metrics = MarketMetricsConfig::default().compute(&CurrencyConverter::new(&rates));
        assert_eq!(metrics.trend, MarketTrend::Bullish);
        assert!(metrics.volatility_index > 0.0 && metrics.volatility_index <= 1.0);
    }

    #[test]
    fn test_index_is_capped() {
        let rates = table(&[("EUR", 5.0), ("GBP", 5.0)]);
        let metrics = MarketMetricsConfig::default().compute(&CurrencyConverter::new(&rates));
        assert_eq!(metrics.volatility_index, 1.0);
        // two above, three missing: +0.2 is not beyond the threshold
        assert_eq!(metrics.trend, MarketTrend::Neutral);
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(MarketTrend::Bullish.multiplier(), 1.2);
        assert_eq!(MarketTrend::Bearish.multiplier(), 0.8);
        assert_eq!(MarketTrend::Neutral.multiplier(), 1.0);
    }
}
