use crate::adapters::{AhrefsClient, GoogleTrendsClient, SemrushClient};
use crate::config::AppConfig;
use crate::core::report::{
    render_competitor_section, render_metrics_section, render_summary, render_trends_section,
};
use crate::domain::model::{CompetitorResult, Keyword, MetricsResult, Report, TrendsResult};
use crate::domain::ports::{CompetitorProvider, MetricsProvider, TrendsProvider};
use crate::utils::error::{ProviderError, ProviderResult, Result};
use std::io::Write;

/// Queries the three providers one after another and combines whatever
/// they return. A failing provider leaves its slot empty; it never stops
/// the run.
pub struct Aggregator {
    metrics: Box<dyn MetricsProvider>,
    trends: Box<dyn TrendsProvider>,
    competitors: Box<dyn CompetitorProvider>,
}

/// Every provider failure ends up as an absent slot. The kind of failure
/// only survives in the log.
fn absent_on_error<T>(result: ProviderResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(ProviderError::EmptyResult { provider }) => {
            tracing::info!("No data available from {}", provider);
            None
        }
        Err(e) => {
            tracing::warn!("❌ Error fetching data from {}: {}", e.provider(), e);
            None
        }
    }
}

fn emit<W: Write>(out: &mut W, section: &str) -> Result<()> {
    writeln!(out, "\n{}", section)?;
    out.flush()?;
    Ok(())
}

impl Aggregator {
    pub fn new<M, T, C>(metrics: M, trends: T, competitors: C) -> Self
    where
        M: MetricsProvider + 'static,
        T: TrendsProvider + 'static,
        C: CompetitorProvider + 'static,
    {
        Self {
            metrics: Box::new(metrics),
            trends: Box::new(trends),
            competitors: Box::new(competitors),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            AhrefsClient::new(config.metrics.clone()),
            GoogleTrendsClient::new(config.trends.clone()),
            SemrushClient::new(config.competitors.clone()),
        )
    }

    async fn fetch_metrics(&self, keyword: &Keyword) -> Option<MetricsResult> {
        tracing::debug!("Fetching keyword metrics for '{}'", keyword);
        absent_on_error(self.metrics.keyword_metrics(keyword).await)
    }

    async fn fetch_trends(&self, keyword: &Keyword) -> Option<TrendsResult> {
        tracing::debug!("Fetching trends for '{}'", keyword);
        absent_on_error(self.trends.interest_over_time(keyword).await)
    }

    async fn fetch_competitors(&self, keyword: &Keyword) -> Option<CompetitorResult> {
        tracing::debug!("Fetching competitors for '{}'", keyword);
        absent_on_error(self.competitors.competitors(keyword).await)
    }

    /// Builds the report without printing anything.
    pub async fn collect(&self, keyword: &Keyword) -> Report {
        let mut report = Report::empty(keyword.clone());
        report.metrics = self.fetch_metrics(keyword).await;
        report.trends = self.fetch_trends(keyword).await;
        report.competitors = self.fetch_competitors(keyword).await;
        report
    }

    /// Builds the report and writes each section to `out` as soon as its
    /// provider answers, followed by the summary. Only writing to `out`
    /// can fail.
    pub async fn run<W: Write>(&self, keyword: &Keyword, out: &mut W) -> Result<Report> {
        tracing::info!("🚀 Starting SEO analysis for '{}'", keyword);
        let mut report = Report::empty(keyword.clone());

        report.metrics = self.fetch_metrics(keyword).await;
        if let Some(metrics) = &report.metrics {
            emit(out, &render_metrics_section(metrics))?;
        }

        report.trends = self.fetch_trends(keyword).await;
        if let Some(trends) = &report.trends {
            emit(out, &render_trends_section(trends))?;
        }

        report.competitors = self.fetch_competitors(keyword).await;
        if let Some(competitors) = &report.competitors {
            emit(out, &render_competitor_section(competitors))?;
        }

        emit(out, &render_summary(&report.summary()))?;

        tracing::info!(
            "✅ SEO analysis finished: {}/3 sources available",
            report.present_slots()
        );
        Ok(report)
    }
}
