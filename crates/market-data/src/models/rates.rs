use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::types::Currency;

/// Request for the latest rates relative to `base`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateRequest {
    pub base: Currency,
}

impl RateRequest {
    pub fn new(base: impl Into<Currency>) -> Self {
        Self { base: base.into() }
    }
}

/// Exchange rates relative to a base currency, as reported by one source.
///
/// Every stored rate is a positive finite number and the base currency is
/// never a key. Entries violating that are dropped on construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub base: Currency,
    pub date: NaiveDate,
    pub source: String,
    rates: BTreeMap<Currency, f64>,
}

impl RateTable {
    pub fn new(
        base: impl Into<Currency>,
        date: NaiveDate,
        source: impl Into<String>,
        raw: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        let base = base.into().to_ascii_uppercase();
        let source = source.into();
        let mut rates = BTreeMap::new();
        for (code, rate) in raw {
            let code = code.to_ascii_uppercase();
            if code == base {
                continue;
            }
            if !is_valid_rate(rate) {
                warn!("{}: dropping invalid rate for {}: {}", source, code, rate);
                continue;
            }
            rates.insert(code, rate);
        }
        Self {
            base,
            date,
            source,
            rates,
        }
    }

    /// Table dated today (UTC).
    pub fn today(
        base: impl Into<Currency>,
        source: impl Into<String>,
        raw: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        Self::new(base, Utc::now().date_naive(), source, raw)
    }

    pub fn rates(&self) -> &BTreeMap<Currency, f64> {
        &self.rates
    }

    pub fn into_rates(self) -> BTreeMap<Currency, f64> {
        self.rates
    }

    /// Units of `currency` per one unit of the base. The base itself is 1.
    pub fn rate(&self, currency: &str) -> Option<f64> {
        if currency.eq_ignore_ascii_case(&self.base) {
            return Some(1.0);
        }
        self.rates.get(&currency.to_ascii_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Express the table relative to `new_base`.
    ///
    /// Returns `None` when `new_base` is not quoted in this table. The old
    /// base becomes an ordinary entry at `1 / rate(new_base)`.
    pub fn rebase(&self, new_base: &str) -> Option<RateTable> {
        let new_base = new_base.to_ascii_uppercase();
        if new_base == self.base {
            return Some(self.clone());
        }
        let pivot = *self.rates.get(&new_base)?;
        let mut raw: Vec<(String, f64)> = self
            .rates
            .iter()
            .filter(|(code, _)| **code != new_base)
            .map(|(code, rate)| (code.clone(), rate / pivot))
            .collect();
        raw.push((self.base.clone(), 1.0 / pivot));
        Some(RateTable::new(new_base, self.date, self.source.clone(), raw))
    }

    /// Keep only the listed currencies.
    pub fn retain_currencies(&mut self, keep: &[String]) {
        self.rates
            .retain(|code, _| keep.iter().any(|k| k.eq_ignore_ascii_case(code)));
    }
}

pub fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}
