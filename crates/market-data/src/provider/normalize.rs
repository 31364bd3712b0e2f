//! Normalisation shared by the rate adapters.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::errors::MarketDataError;
use crate::models::RateTable;

/// Build a table for `requested_base` from a provider answer quoted against
/// `reported_base`, rebasing when the provider ignored the requested base.
pub(crate) fn rate_table(
    provider: &str,
    requested_base: &str,
    reported_base: &str,
    date: Option<&str>,
    rates: HashMap<String, f64>,
) -> Result<RateTable, MarketDataError> {
    let date = date
        .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive());

    let table = RateTable::new(reported_base, date, provider, rates);
    if table.is_empty() {
        return Err(MarketDataError::malformed(provider, "No usable rates in response"));
    }

    table.rebase(requested_base).ok_or_else(|| {
        MarketDataError::malformed(
            provider,
            format!(
                "Quoted against {} and cannot be rebased to {}",
                reported_base, requested_base
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_base_is_kept() {
        let rates = HashMap::from([("EUR".to_string(), 0.9)]);
        let table = rate_table("TEST", "USD", "USD", Some("2024-03-01"), rates).unwrap();
        assert_eq!(table.base, "USD");
        assert_eq!(table.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_timestamp_dates_are_truncated() {
        let rates = HashMap::from([("EUR".to_string(), 0.9)]);
        let table = rate_table("TEST", "USD", "USD", Some("2024-03-01T23:59:59Z"), rates).unwrap();
        assert_eq!(table.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_foreign_base_is_rebased() {
        let rates = HashMap::from([("USD".to_string(), 1.25), ("GBP".to_string(), 0.85)]);
        let table = rate_table("TEST", "USD", "EUR", None, rates).unwrap();
        assert_eq!(table.base, "USD");
        assert!((table.rate("EUR").unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_empty_rates_are_malformed() {
        let err = rate_table("TEST", "USD", "USD", None, HashMap::new()).unwrap_err();
        assert!(matches!(err, MarketDataError::MalformedPayload { .. }));
    }
}
