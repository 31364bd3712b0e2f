//! Yahoo Finance API response models.
//!
//! The chart endpoint carries both the latest price (in `meta`) and the daily
//! closes used for history. The v7 quote endpoint adds valuation fields.

use serde::Deserialize;

/// Main response wrapper for the v8 chart API
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: YahooChart,
}

#[derive(Debug, Deserialize)]
pub struct YahooChart {
    pub result: Option<Vec<YahooChartResult>>,
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
pub struct YahooApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    pub meta: YahooChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Option<YahooIndicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooChartMeta {
    pub symbol: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub regular_market_volume: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooIndicatorQuote>,
}

/// Closes are nullable on days the exchange reported nothing.
#[derive(Debug, Deserialize)]
pub struct YahooIndicatorQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Response wrapper for the v7 quote API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteResponse {
    pub quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
pub struct YahooQuoteResult {
    #[serde(default)]
    pub result: Vec<YahooQuoteDetail>,
}

/// Valuation fields used to enrich a chart quote.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteDetail {
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    /// Fraction, e.g. 0.0135 for 1.35%
    pub dividend_yield: Option<f64>,
    pub beta: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub average_daily_volume10_day: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_nullable_closes() {
        let json = r#"{"close": [101.5, null, 102.25]}"#;
        let quote: YahooIndicatorQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.close, vec![Some(101.5), None, Some(102.25)]);
    }

    #[test]
    fn test_deserialize_quote_detail() {
        let json = r#"{"marketCap": 3.9e11, "trailingPE": 24.1, "dividendYield": 0.0135, "averageDailyVolume10Day": 3200000}"#;
        let detail: YahooQuoteDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.trailing_pe, Some(24.1));
        assert_eq!(detail.average_daily_volume10_day, Some(3_200_000.0));
        assert!(detail.beta.is_none());
    }
}
