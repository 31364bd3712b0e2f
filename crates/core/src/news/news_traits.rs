use async_trait::async_trait;

use super::news_model::NewsFeed;
use crate::errors::Result;

/// Trait defining the contract for news service operations.
#[async_trait]
pub trait NewsServiceTrait: Send + Sync {
    /// Poll every configured feed and return scored articles, newest first.
    async fn get_financial_news(&self) -> Result<NewsFeed>;
}
