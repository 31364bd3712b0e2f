//! Reconciliation of concurrently fetched rate tables.

mod median;

pub use median::{median, median_merge, merge_rate_tables, MEDIAN_SOURCE};
