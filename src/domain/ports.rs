use crate::domain::model::{CompetitorResult, Keyword, MetricsResult, TrendsResult};
use crate::utils::error::ProviderResult;
use async_trait::async_trait;

/// Keyword volume/difficulty/clicks source.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    async fn keyword_metrics(&self, keyword: &Keyword) -> ProviderResult<MetricsResult>;
}

/// Interest-over-time source for a trailing window.
///
/// An empty series must be reported as `ProviderError::EmptyResult`.
#[async_trait]
pub trait TrendsProvider: Send + Sync {
    async fn interest_over_time(&self, keyword: &Keyword) -> ProviderResult<TrendsResult>;
}

#[async_trait]
pub trait CompetitorProvider: Send + Sync {
    async fn competitors(&self, keyword: &Keyword) -> ProviderResult<CompetitorResult>;
}
