use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    routing::get,
    Json, Router,
};
use livetools_core::fx::RatesSnapshot;

use super::{provenance_headers, SLOW_DATA_MAX_AGE, X_MARKET_SENTIMENT};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::RatesQuery,
};

async fn get_currency_rates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RatesQuery>,
) -> ApiResult<(HeaderMap, Json<RatesSnapshot>)> {
    let snapshot = state
        .fx_service
        .get_latest_rates(query.base())
        .await
        .map_err(ApiError::service("Failed to fetch currency rates"))?;

    let mut headers = provenance_headers(snapshot.provenance, SLOW_DATA_MAX_AGE);
    if let Some(bias) = &snapshot.sentiment {
        headers.insert(
            HeaderName::from_static(X_MARKET_SENTIMENT),
            HeaderValue::from_static(bias.as_str()),
        );
    }
    Ok((headers, Json(snapshot)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/currency-rates", get(get_currency_rates))
}
