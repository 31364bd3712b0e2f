use std::ops::Range;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rand::Rng;

use crate::models::{round2, PricePoint, Quote};
use crate::registry::SYNTHETIC_SOURCE;

/// Ranges the synthetic quote fields are drawn from.
#[derive(Clone, Debug)]
pub struct SyntheticQuotes {
    pub price: Range<f64>,
    /// Absolute daily change, centred on zero
    pub change: Range<f64>,
    pub volume: Range<u64>,
    pub market_cap: Range<f64>,
    pub pe_ratio: Range<f64>,
    pub dividend_yield: Range<f64>,
    pub beta: Range<f64>,
    /// 52-week high as a multiple of price
    pub high_multiple: Range<f64>,
    /// 52-week low as a multiple of price
    pub low_multiple: Range<f64>,
    pub avg_volume: Range<u64>,
}

impl Default for SyntheticQuotes {
    fn default() -> Self {
        Self {
            price: 100.0..300.0,
            change: -5.0..5.0,
            volume: 1_000_000..11_000_000,
            market_cap: 10e9..1_010e9,
            pe_ratio: 15.0..35.0,
            dividend_yield: 0.0..5.0,
            beta: 0.5..2.0,
            high_multiple: 1.1..1.3,
            low_multiple: 0.6..0.8,
            avg_volume: 1_000_000..6_000_000,
        }
    }
}

impl SyntheticQuotes {
    pub fn generate<R: Rng + ?Sized>(&self, symbol: &str, now: DateTime<Utc>, rng: &mut R) -> Quote {
        let price = rng.gen_range(self.price.clone());
        let change = rng.gen_range(self.change.clone());
        Quote {
            symbol: symbol.to_string(),
            price: round2(price),
            change: round2(change),
            change_percent: round2(change / price * 100.0),
            volume: rng.gen_range(self.volume.clone()),
            market_cap: rng.gen_range(self.market_cap.clone()).floor(),
            pe_ratio: round2(rng.gen_range(self.pe_ratio.clone())),
            dividend_yield: round2(rng.gen_range(self.dividend_yield.clone())),
            beta: round2(rng.gen_range(self.beta.clone())),
            fifty_two_week_high: round2(price * rng.gen_range(self.high_multiple.clone())),
            fifty_two_week_low: round2(price * rng.gen_range(self.low_multiple.clone())),
            avg_volume: rng.gen_range(self.avg_volume.clone()),
            source: SYNTHETIC_SOURCE.to_string(),
            timestamp: now,
        }
    }
}

/// Generator for a daily close series around an anchor price.
#[derive(Clone, Debug)]
pub struct SyntheticHistory {
    /// Calendar days covered, ending today.
    pub days: u32,
    /// Half-width of the jitter around the anchor, in price units.
    pub jitter: f64,
    pub skip_weekends: bool,
}

impl Default for SyntheticHistory {
    fn default() -> Self {
        Self {
            days: 30,
            jitter: 10.0,
            skip_weekends: true,
        }
    }
}

impl SyntheticHistory {
    /// Closes for the `days` calendar days ending on `today`, oldest first.
    pub fn generate<R: Rng + ?Sized>(&self, anchor: f64, today: NaiveDate, rng: &mut R) -> Vec<PricePoint> {
        (0..self.days)
            .rev()
            .filter_map(|offset| today.checked_sub_signed(Duration::days(i64::from(offset))))
            .filter(|date| !(self.skip_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun)))
            .map(|date| {
                let jitter = if self.jitter > 0.0 {
                    rng.gen_range(-self.jitter..self.jitter)
                } else {
                    0.0
                };
                PricePoint::new(date, (anchor + jitter).max(0.01))
            })
            .collect()
    }
}
