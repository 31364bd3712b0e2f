use livetools_market_data::RateTable;

use crate::errors::{Error, Result};

/// Cross-rate calculator over one base-relative rate table.
///
/// Every rate in the table is "units of X per one unit of base", so the
/// rate from A to B is `rate(B) / rate(A)`. A currency the table does not
/// quote is an error; it never defaults to 1.
#[derive(Clone, Debug)]
pub struct CurrencyConverter<'a> {
    table: &'a RateTable,
}

impl<'a> CurrencyConverter<'a> {
    pub fn new(table: &'a RateTable) -> Self {
        Self { table }
    }

    pub fn base(&self) -> &str {
        &self.table.base
    }

    fn units_per_base(&self, currency: &str) -> Result<f64> {
        self.table
            .rate(currency)
            .ok_or_else(|| Error::UnsupportedCurrency(currency.to_ascii_uppercase()))
    }

    /// Units of `to` received for one unit of `from`.
    pub fn rate(&self, from: &str, to: &str) -> Result<f64> {
        if from.eq_ignore_ascii_case(to) {
            return Ok(1.0);
        }
        let from_rate = self.units_per_base(from)?;
        let to_rate = self.units_per_base(to)?;
        Ok(to_rate / from_rate)
    }

    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        Ok(amount * self.rate(from, to)?)
    }
}
