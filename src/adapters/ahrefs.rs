use crate::config::MetricsSettings;
use crate::domain::model::{Keyword, MetricValue, MetricsResult};
use crate::domain::ports::MetricsProvider;
use crate::utils::error::{ProviderError, ProviderKind, ProviderResult};
use reqwest::Client;
use std::time::Duration;

const PROVIDER: ProviderKind = ProviderKind::Metrics;

/// Ahrefs v2 `keywords_info` client.
pub struct AhrefsClient {
    client: Client,
    settings: MetricsSettings,
}

impl AhrefsClient {
    pub fn new(settings: MetricsSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: MetricsSettings) -> Self {
        Self { client, settings }
    }
}

/// Reads `volume`, `difficulty` and `clicks` from the top level, or from a
/// nested `metrics` object when the API wraps them.
fn parse_metrics(keyword: &Keyword, body: &serde_json::Value) -> ProviderResult<MetricsResult> {
    let obj = body
        .as_object()
        .ok_or_else(|| ProviderError::decode(PROVIDER, "expected a JSON object"))?;

    if let Some(error) = obj.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ProviderError::Rejected {
            provider: PROVIDER,
            message,
        });
    }

    let fields = obj
        .get("metrics")
        .and_then(|m| m.as_object())
        .unwrap_or(obj);

    Ok(MetricsResult {
        keyword: keyword.clone(),
        volume: MetricValue::from_json(fields.get("volume")),
        difficulty: MetricValue::from_json(fields.get("difficulty")),
        clicks: MetricValue::from_json(fields.get("clicks")),
    })
}

#[async_trait::async_trait]
impl MetricsProvider for AhrefsClient {
    async fn keyword_metrics(&self, keyword: &Keyword) -> ProviderResult<MetricsResult> {
        let token = self.settings.api_key.as_deref().unwrap_or_default();

        tracing::debug!("Requesting Ahrefs metrics from: {}", self.settings.endpoint);

        let response = self
            .client
            .get(&self.settings.endpoint)
            .query(&[
                ("from", "keywords_info"),
                ("target", keyword.as_str()),
                ("token", token),
                ("output", "json"),
            ])
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let status = response.status();
        tracing::debug!("Ahrefs response status: {}", status);

        if !status.is_success() {
            return Err(ProviderError::from_status(PROVIDER, status));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::decode(PROVIDER, e.without_url().to_string()))?;

        parse_metrics(keyword, &body)
    }
}
