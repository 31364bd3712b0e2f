use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    routing::get,
    Json, Router,
};
use livetools_core::etf::EtfSnapshot;

use super::{provenance_headers, QUOTE_DATA_MAX_AGE, X_MISSING_SYMBOLS};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::SymbolsQuery,
};

/// Adds `X-Missing-Symbols` when some requested symbols could not be served.
pub(crate) fn insert_missing(headers: &mut HeaderMap, missing: &[String]) {
    if missing.is_empty() {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&missing.join(",")) {
        headers.insert(HeaderName::from_static(X_MISSING_SYMBOLS), value);
    }
}

async fn get_etf_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SymbolsQuery>,
) -> ApiResult<(HeaderMap, Json<BTreeMap<String, EtfSnapshot>>)> {
    let data = state
        .etf_service
        .get_etf_data(&query.symbols())
        .await
        .map_err(ApiError::service("Failed to fetch ETF data"))?;

    let mut headers = provenance_headers(data.provenance, QUOTE_DATA_MAX_AGE);
    insert_missing(&mut headers, &data.missing);
    Ok((headers, Json(data.etfs)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/etf-data", get(get_etf_data))
}
