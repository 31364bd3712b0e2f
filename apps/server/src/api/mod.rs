use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use chrono::Utc;
use livetools_market_data::Provenance;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, main_lib::AppState};

mod currency;
mod etf;
mod news;
mod tools;

pub const X_DATA_SOURCE: &str = "x-data-source";
pub const X_TIMESTAMP: &str = "x-timestamp";
pub const X_MARKET_SENTIMENT: &str = "x-market-sentiment";
pub const X_MISSING_SYMBOLS: &str = "x-missing-symbols";

/// Cache lifetime of rate and news responses, seconds.
pub const SLOW_DATA_MAX_AGE: u32 = 300;
/// Cache lifetime of quote-derived responses, seconds.
pub const QUOTE_DATA_MAX_AGE: u32 = 60;

pub async fn healthz() -> &'static str {
    "ok"
}

/// `X-Data-Source`, `X-Timestamp` and `Cache-Control` for a data response.
pub(crate) fn provenance_headers(provenance: Provenance, max_age: u32) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(X_DATA_SOURCE),
        HeaderValue::from_static(provenance.header_value()),
    );
    if let Ok(value) = HeaderValue::from_str(&Utc::now().to_rfc3339()) {
        headers.insert(HeaderName::from_static(X_TIMESTAMP), value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", max_age)) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    headers
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };
    cors.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
        .expose_headers([
            HeaderName::from_static(X_DATA_SOURCE),
            HeaderName::from_static(X_TIMESTAMP),
            HeaderName::from_static(X_MARKET_SENTIMENT),
            HeaderName::from_static(X_MISSING_SYMBOLS),
        ])
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(currency::router())
        .merge(etf::router())
        .merge(news::router())
        .nest("/tools", tools::router());

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        // last added runs first: the id is set before it is propagated, and
        // CORS headers reach timeout responses
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}
