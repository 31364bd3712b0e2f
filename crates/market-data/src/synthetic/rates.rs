use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Timelike, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::RateTable;
use crate::registry::SYNTHETIC_SOURCE;

/// Direction of the synthetic market index.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketBias {
    Bullish,
    Bearish,
}

impl MarketBias {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketBias::Bullish => "bullish",
            MarketBias::Bearish => "bearish",
        }
    }
}

/// Reference rate per USD with the harmonic used for its seasonal drift.
#[derive(Clone, Debug, PartialEq)]
pub struct RateSeed {
    pub currency: String,
    pub per_usd: f64,
    pub harmonic: f64,
}

/// Generated table plus the bias of the index applied to it.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticRateSet {
    pub table: RateTable,
    pub bias: MarketBias,
}

/// Generator for plausible exchange rates.
///
/// Each seed drifts with the day of year and the hour, then every rate is
/// nudged by a shared market index and independent noise.
#[derive(Clone, Debug)]
pub struct SyntheticRates {
    pub seeds: Vec<RateSeed>,
    /// Amplitude of the yearly drift, as a fraction.
    pub seasonal_amplitude: f64,
    /// Amplitude of the intraday drift, as a fraction.
    pub intraday_amplitude: f64,
    /// Constant offset applied to every seed.
    pub offset: f64,
    /// Half-width of the per-currency noise, as a fraction.
    pub noise: f64,
    /// Amplitude of the shared market index, as a fraction.
    pub index_amplitude: f64,
}

impl Default for SyntheticRates {
    fn default() -> Self {
        let seeds = [
            ("EUR", 0.85, 2.0),
            ("GBP", 0.73, 2.0),
            ("JPY", 150.0, 4.0),
            ("CAD", 1.35, 3.0),
            ("AUD", 1.2, 4.0),
            ("CHF", 0.97, 6.0),
            ("CNY", 7.25, 4.0),
            ("INR", 83.1, 7.0),
            ("BRL", 5.1, 9.0),
            ("MXN", 18.5, 10.0),
            ("KRW", 1320.0, 11.0),
            ("SGD", 1.35, 12.0),
            ("HKD", 7.8, 13.0),
            ("NOK", 10.8, 14.0),
            ("SEK", 10.5, 15.0),
            ("DKK", 6.9, 16.0),
            ("PLN", 4.1, 17.0),
            ("CZK", 23.3, 18.0),
            ("HUF", 360.0, 19.0),
        ]
        .into_iter()
        .map(|(currency, per_usd, harmonic)| RateSeed {
            currency: currency.to_string(),
            per_usd,
            harmonic,
        })
        .collect();

        Self {
            seeds,
            seasonal_amplitude: 0.005,
            intraday_amplitude: 0.001,
            offset: 0.002,
            noise: 0.0025,
            index_amplitude: 0.0025,
        }
    }
}

impl SyntheticRates {
    /// Shared index for `now`, within ±`index_amplitude`.
    pub fn market_index(&self, now: DateTime<Utc>) -> f64 {
        let day = f64::from(now.ordinal());
        let hour = f64::from(now.hour()) + f64::from(now.minute()) / 60.0;
        ((day + hour) / 50.0).sin() * self.index_amplitude
    }

    /// Rates relative to `base` at `now`.
    ///
    /// Returns `None` when `base` is neither USD nor a seeded currency.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        base: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<SyntheticRateSet> {
        let day = f64::from(now.ordinal());
        let hour = f64::from(now.hour()) + f64::from(now.minute()) / 60.0;

        let drifted: Vec<(String, f64)> = self
            .seeds
            .iter()
            .enumerate()
            .map(|(i, seed)| {
                // odd seeds run on cosine
                let phase = if i % 2 == 0 { 0.0 } else { PI / 2.0 };
                let seasonal = (day / 365.0 * seed.harmonic * PI + phase).sin();
                let intraday = (hour / 24.0 * seed.harmonic * PI + phase).sin();
                let factor = 1.0
                    + seasonal * self.seasonal_amplitude
                    + intraday * self.intraday_amplitude
                    + self.offset;
                (seed.currency.clone(), seed.per_usd * factor)
            })
            .chain(std::iter::once(("USD".to_string(), 1.0)))
            .collect();

        let base_per_usd = drifted
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(base))
            .map(|(_, r)| *r)?;

        let index = self.market_index(now);
        let rates: Vec<(String, f64)> = drifted
            .into_iter()
            .filter(|(c, _)| !c.eq_ignore_ascii_case(base))
            .map(|(c, r)| {
                let noise = if self.noise > 0.0 {
                    rng.gen_range(-self.noise..self.noise)
                } else {
                    0.0
                };
                (c, r / base_per_usd * (1.0 + noise + index))
            })
            .collect();

        let bias = if index > 0.0 {
            MarketBias::Bullish
        } else {
            MarketBias::Bearish
        };

        Some(SyntheticRateSet {
            table: RateTable::new(base, now.date_naive(), SYNTHETIC_SOURCE, rates),
            bias,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_generate_usd_base() {
        let mut rng = StdRng::seed_from_u64(7);
        let set = SyntheticRates::default().generate("USD", now(), &mut rng).unwrap();
        assert_eq!(set.table.source, SYNTHETIC_SOURCE);
        assert_eq!(set.table.len(), 19);
        let eur = set.table.rate("EUR").unwrap();
        // seasonal + intraday + offset + noise + index stay within about 1.5%
        assert!((eur / 0.85 - 1.0).abs() < 0.015, "eur = {eur}");
    }

    #[test]
    fn test_generate_rebases() {
        let mut rng = StdRng::seed_from_u64(7);
        let set = SyntheticRates::default().generate("EUR", now(), &mut rng).unwrap();
        assert_eq!(set.table.base, "EUR");
        assert!(set.table.rate("USD").is_some());
        assert!(set.table.rates().get("EUR").is_none());
        let usd = set.table.rate("USD").unwrap();
        assert!((usd * 0.85 - 1.0).abs() < 0.03, "usd = {usd}");
    }

    #[test]
    fn test_unknown_base() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(SyntheticRates::default().generate("XYZ", now(), &mut rng).is_none());
    }

    #[test]
    fn test_bias_follows_index() {
        let generator = SyntheticRates {
            noise: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let set = generator.generate("USD", now(), &mut rng).unwrap();
        let expected = if generator.market_index(now()) > 0.0 {
            MarketBias::Bullish
        } else {
            MarketBias::Bearish
        };
        assert_eq!(set.bias, expected);
    }
}
