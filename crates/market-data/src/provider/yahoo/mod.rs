//! Yahoo Finance provider.
//!
//! Latest quotes come from the v8 chart endpoint (price, previous close and
//! volume live in the chart `meta`), enriched on a best-effort basis with the
//! v7 quote endpoint. History comes from the same chart endpoint with a daily
//! interval.

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{
    round2, HistoryRequest, PricePoint, Quote, QuoteDefaults, QuoteRequest,
};
use crate::provider::http::{build_client, get_text, parse_json, DEFAULT_TIMEOUT};
use crate::provider::traits::ProviderAdapter;

use models::{YahooChartResponse, YahooChartResult, YahooQuoteDetail, YahooQuoteResponse};

const PROVIDER_ID: &str = "YAHOO";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";

pub struct YahooProvider {
    client: Client,
    chart_url: String,
    quote_url: String,
    defaults: QuoteDefaults,
}

impl YahooProvider {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            chart_url: CHART_URL.to_string(),
            quote_url: QUOTE_URL.to_string(),
            defaults: QuoteDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: QuoteDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_base_urls(mut self, chart_url: impl Into<String>, quote_url: impl Into<String>) -> Self {
        self.chart_url = chart_url.into();
        self.quote_url = quote_url.into();
        self
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        query: &[(&str, &str)],
    ) -> Result<YahooChartResult, MarketDataError> {
        let url = format!("{}/{}", self.chart_url, urlencoding::encode(symbol));
        let body = match get_text(&self.client, PROVIDER_ID, &url, query).await {
            Err(MarketDataError::HttpStatus { status: 404, .. }) => {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()))
            }
            other => other?,
        };
        first_chart_result(&body, symbol)
    }

    /// Valuation fields from the v7 endpoint. Failures are logged and ignored.
    async fn fetch_detail(&self, symbol: &str) -> Option<YahooQuoteDetail> {
        let result = get_text(&self.client, PROVIDER_ID, &self.quote_url, &[("symbols", symbol)])
            .await
            .and_then(|body| parse_json::<YahooQuoteResponse>(PROVIDER_ID, &body));
        match result {
            Ok(response) => response.quote_response.result.into_iter().next(),
            Err(e) => {
                debug!("{}: enrichment skipped for {}: {}", PROVIDER_ID, symbol, e);
                None
            }
        }
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn first_chart_result(body: &str, symbol: &str) -> Result<YahooChartResult, MarketDataError> {
    let response: YahooChartResponse = parse_json(PROVIDER_ID, body)?;
    if let Some(err) = response.chart.error {
        let message = err
            .description
            .or(err.code)
            .unwrap_or_else(|| "Unknown chart error".to_string());
        warn!("{}: chart error for {}: {}", PROVIDER_ID, symbol, message);
        return Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        });
    }
    response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
}

/// Build a quote from the chart meta, then overlay any enrichment fields.
fn chart_to_quote(
    symbol: &str,
    chart: &YahooChartResult,
    detail: Option<&YahooQuoteDetail>,
    defaults: &QuoteDefaults,
) -> Result<Quote, MarketDataError> {
    let meta = &chart.meta;
    let price = meta
        .regular_market_price
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "Missing regularMarketPrice"))?;
    let previous = meta
        .previous_close
        .or(meta.chart_previous_close)
        .filter(|p| p.is_finite() && *p > 0.0)
        .unwrap_or(price);

    let change = price - previous;
    let change_percent = change / previous * 100.0;

    let mut quote = Quote::from_price(symbol, price, change, change_percent, PROVIDER_ID, defaults);
    if let Some(volume) = meta.regular_market_volume {
        quote.volume = volume.max(0.0) as u64;
    }
    if let Some(high) = meta.fifty_two_week_high {
        quote.fifty_two_week_high = round2(high);
    }
    if let Some(low) = meta.fifty_two_week_low {
        quote.fifty_two_week_low = round2(low);
    }

    if let Some(detail) = detail {
        if let Some(cap) = detail.market_cap {
            quote.market_cap = cap;
        }
        if let Some(pe) = detail.trailing_pe {
            quote.pe_ratio = round2(pe);
        }
        if let Some(dy) = detail.dividend_yield {
            quote.dividend_yield = round2(dy * 100.0);
        }
        if let Some(beta) = detail.beta {
            quote.beta = round2(beta);
        }
        if let Some(high) = detail.fifty_two_week_high {
            quote.fifty_two_week_high = round2(high);
        }
        if let Some(low) = detail.fifty_two_week_low {
            quote.fifty_two_week_low = round2(low);
        }
        if let Some(avg) = detail.average_daily_volume10_day {
            quote.avg_volume = avg.max(0.0) as u64;
        }
    }

    Ok(quote)
}

/// Pair chart timestamps with closes, skipping days without a close.
fn chart_to_history(chart: &YahooChartResult) -> Result<Vec<PricePoint>, MarketDataError> {
    let closes = chart
        .indicators
        .as_ref()
        .and_then(|i| i.quote.first())
        .map(|q| q.close.as_slice())
        .ok_or_else(|| MarketDataError::malformed(PROVIDER_ID, "Missing indicators.quote"))?;

    let points: Vec<PricePoint> = chart
        .timestamp
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let close = (*close)?;
            let date = DateTime::<Utc>::from_timestamp(*ts, 0)?.date_naive();
            Some(PricePoint::new(date, close))
        })
        .collect();

    if points.is_empty() {
        return Err(MarketDataError::malformed(PROVIDER_ID, "No closes in chart"));
    }
    Ok(points)
}

#[async_trait]
impl ProviderAdapter<QuoteRequest, Quote> for YahooProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    async fn fetch(&self, request: &QuoteRequest) -> Result<Quote, MarketDataError> {
        let chart = self.fetch_chart(&request.symbol, &[]).await?;
        let detail = self.fetch_detail(&request.symbol).await;
        chart_to_quote(&request.symbol, &chart, detail.as_ref(), &self.defaults)
    }
}

#[async_trait]
impl ProviderAdapter<HistoryRequest, Vec<PricePoint>> for YahooProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    async fn fetch(&self, request: &HistoryRequest) -> Result<Vec<PricePoint>, MarketDataError> {
        let end = Utc::now().timestamp();
        let start = end - i64::from(request.days) * 24 * 60 * 60;
        let (period1, period2) = (start.to_string(), end.to_string());
        let chart = self
            .fetch_chart(
                &request.symbol,
                &[
                    ("period1", period1.as_str()),
                    ("period2", period2.as_str()),
                    ("interval", "1d"),
                ],
            )
            .await?;
        chart_to_history(&chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "VTI",
                    "regularMarketPrice": 251.37,
                    "previousClose": 249.0,
                    "regularMarketVolume": 3120000
                },
                "timestamp": [1714483800, 1714570200, 1714656600],
                "indicators": {"quote": [{"close": [248.1, null, 251.37]}]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_chart_to_quote() {
        let chart = first_chart_result(CHART, "VTI").unwrap();
        let quote = chart_to_quote("VTI", &chart, None, &QuoteDefaults::default()).unwrap();
        assert_eq!(quote.price, 251.37);
        assert_eq!(quote.change, 2.37);
        assert_eq!(quote.change_percent, 0.95);
        assert_eq!(quote.volume, 3_120_000);
        assert_eq!(quote.pe_ratio, 18.5);
        assert_eq!(quote.source, "YAHOO");
    }

    #[test]
    fn test_enrichment_overrides_defaults() {
        let chart = first_chart_result(CHART, "VTI").unwrap();
        let detail = YahooQuoteDetail {
            trailing_pe: Some(23.456),
            dividend_yield: Some(0.0135),
            beta: Some(1.02),
            average_daily_volume10_day: Some(2_900_000.0),
            ..Default::default()
        };
        let quote = chart_to_quote("VTI", &chart, Some(&detail), &QuoteDefaults::default()).unwrap();
        assert_eq!(quote.pe_ratio, 23.46);
        assert_eq!(quote.dividend_yield, 1.35);
        assert_eq!(quote.beta, 1.02);
        assert_eq!(quote.avg_volume, 2_900_000);
    }

    #[test]
    fn test_chart_to_history_skips_nulls() {
        let chart = first_chart_result(CHART, "VTI").unwrap();
        let history = chart_to_history(&chart).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].close, 248.1);
        assert_eq!(history[1].close, 251.37);
        assert!(history[0].date < history[1].date);
    }

    #[test]
    fn test_chart_error_is_provider_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = first_chart_result(body, "NOPE").unwrap_err();
        assert!(matches!(err, MarketDataError::ProviderError { .. }));
    }

    #[test]
    fn test_missing_price_is_malformed() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"VTI"}}],"error":null}}"#;
        let chart = first_chart_result(body, "VTI").unwrap();
        let err = chart_to_quote("VTI", &chart, None, &QuoteDefaults::default()).unwrap_err();
        assert!(matches!(err, MarketDataError::MalformedPayload { .. }));
    }
}
