use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use livetools_core::news::NewsFeed;

use super::{provenance_headers, SLOW_DATA_MAX_AGE};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn get_financial_news(State(state): State<Arc<AppState>>) -> ApiResult<(HeaderMap, Json<NewsFeed>)> {
    let feed = state
        .news_service
        .get_financial_news()
        .await
        .map_err(ApiError::service("Failed to fetch financial news"))?;

    let headers = provenance_headers(feed.provenance, SLOW_DATA_MAX_AGE);
    Ok((headers, Json(feed)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/financial-news", get(get_financial_news))
}
