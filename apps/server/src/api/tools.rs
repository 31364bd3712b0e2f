use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use livetools_core::{
    etf::{weekly_market_regime, EtfHealthReport},
    fx::ArbitrageReport,
    projections::{project_dca, DcaProjection, MarketConditions, PortfolioPredictions},
};

use super::{etf::insert_missing, provenance_headers, QUOTE_DATA_MAX_AGE};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ArbitrageQuery, DcaQuery, HealthQuery, ProjectionBody, SymbolsQuery},
};

async fn analyze_arbitrage(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ArbitrageQuery>,
) -> ApiResult<(HeaderMap, Json<ArbitrageReport>)> {
    let report = state
        .fx_service
        .analyze_arbitrage(&query.into())
        .await
        .map_err(ApiError::service("Failed to analyze arbitrage"))?;
    let headers = provenance_headers(report.provenance, QUOTE_DATA_MAX_AGE);
    Ok((headers, Json(report)))
}

async fn etf_health(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HealthQuery>,
) -> ApiResult<(HeaderMap, Json<EtfHealthReport>)> {
    let regime = match query.regime {
        Some(r) if r.is_finite() => r.clamp(-0.5, 0.5),
        Some(_) => return Err(ApiError::BadRequest("regime must be a number".into())),
        None => weekly_market_regime(Utc::now().timestamp_millis()),
    };
    let symbols = SymbolsQuery {
        symbols: query.symbols,
    }
    .symbols();

    let report = state
        .etf_service
        .predict_health(&symbols, regime)
        .await
        .map_err(ApiError::service("Failed to predict ETF health"))?;

    let mut headers = provenance_headers(report.provenance, QUOTE_DATA_MAX_AGE);
    insert_missing(&mut headers, &report.missing);
    Ok((headers, Json(report)))
}

async fn etf_projection(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProjectionBody>,
) -> ApiResult<Json<PortfolioPredictions>> {
    let conditions = body
        .conditions
        .unwrap_or_else(|| MarketConditions::seasonal(Utc::now().date_naive()));
    let predictions = state
        .etf_service
        .project_portfolio(&body.request, &conditions)
        .await
        .map_err(ApiError::service("Failed to project portfolio"))?;
    Ok(Json(predictions))
}

async fn dca(Query(query): Query<DcaQuery>) -> ApiResult<Json<DcaProjection>> {
    let projection = project_dca(&query.into()).map_err(ApiError::service("Invalid DCA input"))?;
    Ok(Json(projection))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/arbitrage", get(analyze_arbitrage))
        .route("/etf-health", get(etf_health))
        .route("/etf-projection", post(etf_projection))
        .route("/dca", get(dca))
}
