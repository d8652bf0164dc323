use crate::config::CompetitorSettings;
use crate::domain::model::{CompetitorRecord, CompetitorResult, Keyword, MetricValue};
use crate::domain::ports::CompetitorProvider;
use crate::utils::error::{ProviderError, ProviderKind, ProviderResult};
use reqwest::Client;
use std::time::Duration;

const PROVIDER: ProviderKind = ProviderKind::Competitors;
const EXPORT_COLUMNS: &str = "Ph,Nq,Db";

const PHRASE_HEADERS: [&str; 2] = ["Ph", "Keyword"];
const VOLUME_HEADERS: [&str; 2] = ["Nq", "Search Volume"];
const DATABASE_HEADERS: [&str; 2] = ["Db", "Database"];

/// SEMrush analytics client for the `phrase_this` report.
pub struct SemrushClient {
    client: Client,
    settings: CompetitorSettings,
}

impl SemrushClient {
    pub fn new(settings: CompetitorSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: CompetitorSettings) -> Self {
        Self { client, settings }
    }
}

/// SEMrush answers errors with HTTP 200 and a body such as
/// `ERROR 50 :: NOTHING FOUND`.
fn classify_error_body(body: &str) -> Option<ProviderError> {
    let line = body.trim();
    if !line.starts_with("ERROR") {
        return None;
    }

    let code = line
        .split_whitespace()
        .nth(1)
        .and_then(|c| c.parse::<u16>().ok());

    let error = match code {
        Some(50) => ProviderError::EmptyResult { provider: PROVIDER },
        Some(120..=135) => ProviderError::Authentication {
            provider: PROVIDER,
            message: line.to_string(),
        },
        _ => ProviderError::Rejected {
            provider: PROVIDER,
            message: line.to_string(),
        },
    };
    Some(error)
}

fn column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
}

/// Parses the delimited report. SEMrush uses `;`, but `,` is accepted too.
fn parse_report(body: &str) -> ProviderResult<Vec<CompetitorRecord>> {
    let header_line = body.lines().next().unwrap_or_default();
    let delimiter = if header_line.contains(';') { b';' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ProviderError::decode(PROVIDER, e.to_string()))?
        .clone();

    let phrase_idx = column_index(&headers, &PHRASE_HEADERS).ok_or_else(|| {
        ProviderError::decode(PROVIDER, format!("no phrase column in header: {}", header_line))
    })?;
    let volume_idx = column_index(&headers, &VOLUME_HEADERS);
    let database_idx = column_index(&headers, &DATABASE_HEADERS);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ProviderError::decode(PROVIDER, e.to_string()))?;
        let phrase = row.get(phrase_idx).unwrap_or_default();
        if phrase.is_empty() {
            continue;
        }

        let search_volume = volume_idx
            .and_then(|i| row.get(i))
            .and_then(|v| v.parse::<serde_json::Number>().ok())
            .map(MetricValue::Number)
            .unwrap_or(MetricValue::Unknown);

        records.push(CompetitorRecord {
            phrase: phrase.to_string(),
            search_volume,
            database: database_idx
                .and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string(),
        });
    }

    Ok(records)
}

#[async_trait::async_trait]
impl CompetitorProvider for SemrushClient {
    async fn competitors(&self, keyword: &Keyword) -> ProviderResult<CompetitorResult> {
        let key = self.settings.api_key.as_deref().unwrap_or_default();

        tracing::debug!("Requesting SEMrush report from: {}", self.settings.endpoint);

        let response = self
            .client
            .get(&self.settings.endpoint)
            .query(&[
                ("type", "phrase_this"),
                ("key", key),
                ("phrase", keyword.as_str()),
                ("export_columns", EXPORT_COLUMNS),
                ("database", self.settings.database.as_str()),
            ])
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let status = response.status();
        tracing::debug!("SEMrush response status: {}", status);

        if !status.is_success() {
            return Err(ProviderError::from_status(PROVIDER, status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        if let Some(err) = classify_error_body(&body) {
            return Err(err);
        }

        let records = parse_report(&body)?;
        tracing::debug!("SEMrush returned {} rows", records.len());

        if records.is_empty() {
            return Err(ProviderError::EmptyResult { provider: PROVIDER });
        }

        Ok(CompetitorResult { records })
    }
}
