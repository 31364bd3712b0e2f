use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
};
use chrono::NaiveDate;
use livetools_core::{etf::EtfService, fx::FxService, news::NewsService};
use livetools_market_data::{
    DataClass, FallbackPolicy, FeedItem, FeedProvider, HistoryProvider, HistoryRequest,
    MarketDataError, PricePoint, ProviderAdapter, ProviderChain, Quote, QuoteDefaults,
    QuoteProvider, QuoteRequest, RateProvider, RateRequest, RateTable,
};
use livetools_server::{api::app_router, config::Config, AppState};
use serde_json::Value;
use tower::ServiceExt;

struct StaticRates {
    fail: bool,
    hang: bool,
}

#[async_trait]
impl ProviderAdapter<RateRequest, RateTable> for StaticRates {
    fn id(&self) -> &str {
        "STATIC_RATES"
    }

    async fn fetch(&self, request: &RateRequest) -> Result<RateTable, MarketDataError> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail {
            return Err(MarketDataError::HttpStatus {
                provider: "STATIC_RATES".into(),
                status: 502,
            });
        }
        Ok(RateTable::today(
            request.base.clone(),
            "STATIC_RATES",
            vec![("EUR".to_string(), 0.92), ("MXN".to_string(), 18.0)],
        ))
    }
}

struct StaticQuotes {
    known: Vec<&'static str>,
}

#[async_trait]
impl ProviderAdapter<QuoteRequest, Quote> for StaticQuotes {
    fn id(&self) -> &str {
        "STATIC_QUOTES"
    }

    async fn fetch(&self, request: &QuoteRequest) -> Result<Quote, MarketDataError> {
        if !self.known.contains(&request.symbol.as_str()) {
            return Err(MarketDataError::SymbolNotFound(request.symbol.clone()));
        }
        Ok(Quote::from_price(
            request.symbol.clone(),
            250.0,
            1.5,
            0.6,
            "STATIC_QUOTES",
            &QuoteDefaults::default(),
        ))
    }
}

struct StaticHistory;

#[async_trait]
impl ProviderAdapter<HistoryRequest, Vec<PricePoint>> for StaticHistory {
    fn id(&self) -> &str {
        "STATIC_HISTORY"
    }

    async fn fetch(&self, _request: &HistoryRequest) -> Result<Vec<PricePoint>, MarketDataError> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Ok((0..15)
            .map(|i| PricePoint::new(start + chrono::Duration::days(i), 245.0 + i as f64))
            .collect())
    }
}

struct DeadFeed;

#[async_trait]
impl ProviderAdapter<(), Vec<FeedItem>> for DeadFeed {
    fn id(&self) -> &str {
        "DEAD_FEED"
    }

    async fn fetch(&self, _request: &()) -> Result<Vec<FeedItem>, MarketDataError> {
        Err(MarketDataError::malformed("DEAD_FEED", "Invalid RSS"))
    }
}

struct Setup {
    rates_fail: bool,
    rates_hang: bool,
    request_timeout: Option<Duration>,
    fx_policy: FallbackPolicy,
    known_quotes: Vec<&'static str>,
    etf_policy: FallbackPolicy,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            rates_fail: false,
            rates_hang: false,
            request_timeout: None,
            fx_policy: FallbackPolicy::Refuse,
            known_quotes: vec!["VTI", "QQQ"],
            etf_policy: FallbackPolicy::Refuse,
        }
    }
}

fn build_test_router(setup: Setup) -> axum::Router {
    let timeout = Duration::from_secs(5);
    let rates: Vec<RateProvider> = vec![Arc::new(StaticRates {
        fail: setup.rates_fail,
        hang: setup.rates_hang,
    })];
    let quotes: Vec<QuoteProvider> = vec![Arc::new(StaticQuotes {
        known: setup.known_quotes,
    })];
    let history: Vec<HistoryProvider> = vec![Arc::new(StaticHistory)];
    let feeds: Vec<FeedProvider> = vec![Arc::new(DeadFeed)];

    let state = Arc::new(AppState {
        fx_service: Arc::new(FxService::new(
            ProviderChain::new(DataClass::FxRates, rates, timeout),
            setup.fx_policy,
        )),
        etf_service: Arc::new(EtfService::new(
            ProviderChain::new(DataClass::EtfQuotes, quotes, timeout),
            ProviderChain::new(DataClass::EtfQuotes, history, timeout),
            setup.etf_policy,
        )),
        news_service: Arc::new(NewsService::new(
            ProviderChain::new(DataClass::News, feeds, timeout),
            FallbackPolicy::Refuse,
        )),
    });
    let mut config = Config::default();
    if let Some(request_timeout) = setup.request_timeout {
        config.request_timeout = request_timeout;
    }
    app_router(state, &config)
}

async fn get(app: axum::Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header_str<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn healthz_works() {
    let response = get(build_test_router(Setup::default()), "/api/v1/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(header_str(&response, "x-request-id").is_some());
}

#[tokio::test]
async fn request_id_is_generated_and_echoed() {
    let generated = get(build_test_router(Setup::default()), "/api/v1/healthz").await;
    let id = header_str(&generated, "x-request-id").unwrap();
    assert!(!id.is_empty());

    let response = build_test_router(Setup::default())
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .header("x-request-id", "client-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(header_str(&response, "x-request-id"), Some("client-42"));
}

#[tokio::test(start_paused = true)]
async fn request_timeout_keeps_cors_headers() {
    let app = build_test_router(Setup {
        rates_hang: true,
        request_timeout: Some(Duration::from_secs(1)),
        ..Default::default()
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/currency-rates")
                .header(header::ORIGIN, "https://widgets.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        header_str(&response, "access-control-allow-origin"),
        Some("*")
    );
    assert!(header_str(&response, "x-request-id").is_some());
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let app = build_test_router(Setup::default());
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/v1/currency-rates")
                .header(header::ORIGIN, "https://widgets.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "apikey,x-client-info")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header_str(&response, "access-control-allow-origin"),
        Some("*")
    );
    let allowed = header_str(&response, "access-control-allow-headers").unwrap_or_default();
    assert!(allowed.contains("apikey"));
    assert!(allowed.contains("x-client-info"));
}

#[tokio::test]
async fn currency_rates_live() {
    let response = get(
        build_test_router(Setup::default()),
        "/api/v1/currency-rates?base=usd",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "x-data-source"), Some("live-api"));
    assert_eq!(
        header_str(&response, "cache-control"),
        Some("public, max-age=300")
    );
    assert!(header_str(&response, "x-timestamp").is_some());
    assert!(header_str(&response, "x-market-sentiment").is_none());

    let body = json_body(response).await;
    assert_eq!(body["base"], "USD");
    assert_eq!(body["rates"]["EUR"], 0.92);
    assert_eq!(body["provenance"], "live");
    assert_eq!(body["sourcesSucceeded"], 1);
}

#[tokio::test]
async fn currency_rates_all_failed_is_500() {
    let response = get(
        build_test_router(Setup {
            rates_fail: true,
            ..Default::default()
        }),
        "/api/v1/currency-rates",
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to fetch currency rates");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("All providers failed"));
    assert!(body["timestamp"].is_string());
    assert!(body.get("rates").is_none());
}

#[tokio::test]
async fn currency_rates_synthesized_are_flagged() {
    let response = get(
        build_test_router(Setup {
            rates_fail: true,
            fx_policy: FallbackPolicy::Synthesize,
            ..Default::default()
        }),
        "/api/v1/currency-rates",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "x-data-source"), Some("fallback"));
    let sentiment = header_str(&response, "x-market-sentiment").unwrap();
    assert!(sentiment == "bullish" || sentiment == "bearish");

    let body = json_body(response).await;
    assert_eq!(body["provenance"], "synthesized");
    assert_eq!(body["sourcesSucceeded"], 0);
}

#[tokio::test]
async fn invalid_base_is_400() {
    let response = get(
        build_test_router(Setup::default()),
        "/api/v1/currency-rates?base=dollars",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to fetch currency rates");
}

#[tokio::test]
async fn etf_data_fallback_header() {
    let response = get(
        build_test_router(Setup {
            known_quotes: Vec::new(),
            etf_policy: FallbackPolicy::Synthesize,
            ..Default::default()
        }),
        "/api/v1/etf-data?symbols=VTI",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "x-data-source"), Some("fallback"));
    assert_eq!(
        header_str(&response, "cache-control"),
        Some("public, max-age=60")
    );

    let body = json_body(response).await;
    assert_eq!(body["VTI"]["source"], "SYNTHETIC");
    assert_eq!(body["VTI"]["provenance"], "synthesized");
    assert!(body["VTI"]["priceHistory"].as_array().is_some());
}

#[tokio::test]
async fn etf_data_lists_missing_symbols() {
    let response = get(
        build_test_router(Setup::default()),
        "/api/v1/etf-data?symbols=vti,zzzz",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header_str(&response, "x-data-source"), Some("partial"));
    assert_eq!(header_str(&response, "x-missing-symbols"), Some("ZZZZ"));

    let body = json_body(response).await;
    assert_eq!(body["VTI"]["price"], 250.0);
    assert_eq!(body["VTI"]["priceHistory"].as_array().unwrap().len(), 15);
    assert!(body.get("ZZZZ").is_none());
}

#[tokio::test]
async fn news_all_feeds_down_is_500() {
    let response = get(build_test_router(Setup::default()), "/api/v1/financial-news").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to fetch financial news");
}

#[tokio::test]
async fn arbitrage_two_leg() {
    let response = get(
        build_test_router(Setup::default()),
        "/api/v1/tools/arbitrage?amount=1000&from1=USD&to1=MXN&from3=None",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["result"]["initialAmount"], 1000.0);
    assert!(body["result"]["profit"].as_f64().unwrap().abs() < 1e-9);
    assert_eq!(body["rates"]["first"], 18.0);
}

#[tokio::test]
async fn etf_health_with_explicit_regime() {
    let response = get(
        build_test_router(Setup::default()),
        "/api/v1/tools/etf-health?symbols=VTI,QQQ&regime=0",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["predictions"].as_array().unwrap().len(), 2);
    assert_eq!(body["marketRegime"], 0.0);
}

#[tokio::test]
async fn etf_projection() {
    let app = build_test_router(Setup::default());
    let payload = serde_json::json!({
        "holdings": [{"symbol": "VTI", "weight": 60.0}, {"symbol": "QQQ", "weight": 40.0}],
        "age": 35,
        "payment": 100.0,
        "frequency": "biweekly"
    });
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/tools/etf-projection")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["oneYear"]["totalContributions"], 2600.0);
    assert_eq!(body["toRetirement"]["yearsToRetirement"], 30);
}

#[tokio::test]
async fn dca_biweekly_hundred() {
    let response = get(
        build_test_router(Setup::default()),
        "/api/v1/tools/dca?payment=100&frequency=biweekly&months=12",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["paymentCount"], 26);
    assert_eq!(body["totalContributions"], 2600.0);
    assert_eq!(body["totalValue"], 2600.0);
}
