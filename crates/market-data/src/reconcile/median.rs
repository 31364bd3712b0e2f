use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{is_valid_rate, Currency, RateTable};

/// Source id of a merged table.
pub const MEDIAN_SOURCE: &str = "MEDIAN";

/// Median of the finite values in `values`.
///
/// Odd counts take the middle value, even counts the mean of the two middle
/// values. Returns `None` when no finite value is present.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Per-currency median across rate fragments.
///
/// A currency present in at least one fragment appears in the result; a
/// currency present in none stays absent. The result does not depend on the
/// order of `fragments`.
pub fn median_merge<'a, I>(fragments: I) -> BTreeMap<Currency, f64>
where
    I: IntoIterator<Item = &'a BTreeMap<Currency, f64>>,
{
    let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for fragment in fragments {
        for (code, rate) in fragment {
            if is_valid_rate(*rate) {
                samples.entry(code.as_str()).or_default().push(*rate);
            }
        }
    }

    samples
        .into_iter()
        .filter_map(|(code, values)| median(&values).map(|m| (code.to_string(), m)))
        .collect()
}

/// Merge same-base tables into one table sourced [`MEDIAN_SOURCE`].
///
/// Fragments quoted against another base are rebased first and dropped if
/// that is impossible. Returns `None` when nothing usable remains. The merged
/// date is the most recent fragment date.
pub fn merge_rate_tables(base: &str, fragments: &[RateTable]) -> Option<RateTable> {
    let aligned: Vec<RateTable> = fragments.iter().filter_map(|t| t.rebase(base)).collect();
    if aligned.is_empty() {
        return None;
    }

    let date = aligned
        .iter()
        .map(|t| t.date)
        .max()
        .unwrap_or(NaiveDate::MIN);
    let merged = median_merge(aligned.iter().map(|t| t.rates()));
    if merged.is_empty() {
        return None;
    }
    Some(RateTable::new(base, date, MEDIAN_SOURCE, merged))
}
