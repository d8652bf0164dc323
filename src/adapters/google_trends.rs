use crate::config::TrendsSettings;
use crate::domain::model::{Keyword, TrendPoint, TrendsResult};
use crate::domain::ports::TrendsProvider;
use crate::utils::error::{ProviderError, ProviderKind, ProviderResult};
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const PROVIDER: ProviderKind = ProviderKind::Trends;
const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";
const TIMESERIES_WIDGET: &str = "TIMESERIES";
/// Interest is always requested over the trailing twelve months.
const TIMEFRAME: &str = "today 12-m";

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    request: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: Timeline,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelineEntry>,
}

#[derive(Debug, Deserialize)]
struct TimelineEntry {
    time: String,
    #[serde(default)]
    value: Vec<u32>,
    #[serde(rename = "isPartial", default)]
    is_partial: bool,
}

/// Google Trends interest-over-time client.
///
/// The public endpoints need two calls: `explore` hands out a signed
/// request/token pair for the time-series widget, and `multiline` returns
/// the data for that pair.
pub struct GoogleTrendsClient {
    client: Client,
    settings: TrendsSettings,
}

impl GoogleTrendsClient {
    pub fn new(settings: TrendsSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: TrendsSettings) -> Self {
        Self { client, settings }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> ProviderResult<String> {
        let url = self.url(path);
        tracing::debug!("Requesting Google Trends: {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .timeout(Duration::from_secs(self.settings.timeout_seconds))
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        let status = response.status();
        tracing::debug!("Google Trends response status: {}", status);

        if !status.is_success() {
            return Err(ProviderError::from_status(PROVIDER, status));
        }

        response
            .text()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))
    }

    fn explore_request(&self, keyword: &Keyword) -> serde_json::Value {
        serde_json::json!({
            "comparisonItem": [{
                "keyword": keyword.as_str(),
                "time": TIMEFRAME,
                "geo": self.settings.geo,
            }],
            "category": 0,
            "property": "",
        })
    }

    async fn timeseries_widget(&self, keyword: &Keyword) -> ProviderResult<Widget> {
        let req = self.explore_request(keyword);

        let body = self
            .get_text(
                EXPLORE_PATH,
                &[
                    ("hl", self.settings.hl.clone()),
                    ("tz", self.settings.tz.to_string()),
                    ("req", req.to_string()),
                ],
            )
            .await?;

        let explore: ExploreResponse = serde_json::from_str(strip_xssi_prefix(&body)?)
            .map_err(|e| ProviderError::decode(PROVIDER, e.to_string()))?;

        explore
            .widgets
            .into_iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .ok_or_else(|| ProviderError::decode(PROVIDER, "explore response has no TIMESERIES widget"))
    }
}

/// Trends prefixes its JSON with `)]}'` (and sometimes a comma) to block
/// script inclusion; the payload starts at the first `{`.
fn strip_xssi_prefix(body: &str) -> ProviderResult<&str> {
    body.find('{')
        .map(|start| &body[start..])
        .ok_or_else(|| ProviderError::decode(PROVIDER, "response contains no JSON object"))
}

fn parse_timeline(body: &str) -> ProviderResult<Vec<TrendPoint>> {
    let parsed: MultilineResponse = serde_json::from_str(strip_xssi_prefix(body)?)
        .map_err(|e| ProviderError::decode(PROVIDER, e.to_string()))?;

    let partial = parsed
        .default
        .timeline_data
        .iter()
        .filter(|entry| entry.is_partial)
        .count();
    if partial > 0 {
        tracing::debug!("Dropping partial-period flag on {} trend points", partial);
    }

    parsed
        .default
        .timeline_data
        .into_iter()
        .map(|entry| -> ProviderResult<TrendPoint> {
            let seconds: i64 = entry.time.parse().map_err(|_| {
                ProviderError::decode(PROVIDER, format!("invalid timestamp: {}", entry.time))
            })?;
            let date = DateTime::from_timestamp(seconds, 0)
                .ok_or_else(|| {
                    ProviderError::decode(PROVIDER, format!("timestamp out of range: {}", seconds))
                })?
                .date_naive();
            let interest = entry.value.first().copied().ok_or_else(|| {
                ProviderError::decode(PROVIDER, format!("no interest value for {}", date))
            })?;
            Ok(TrendPoint { date, interest })
        })
        .collect()
}

#[async_trait::async_trait]
impl TrendsProvider for GoogleTrendsClient {
    async fn interest_over_time(&self, keyword: &Keyword) -> ProviderResult<TrendsResult> {
        let widget = self.timeseries_widget(keyword).await?;
        let token = widget
            .token
            .ok_or_else(|| ProviderError::decode(PROVIDER, "TIMESERIES widget has no token"))?;

        let body = self
            .get_text(
                MULTILINE_PATH,
                &[
                    ("hl", self.settings.hl.clone()),
                    ("tz", self.settings.tz.to_string()),
                    ("req", widget.request.to_string()),
                    ("token", token),
                ],
            )
            .await?;

        let points = parse_timeline(&body)?;
        tracing::debug!("Google Trends returned {} points", points.len());

        TrendsResult::new(points).ok_or(ProviderError::EmptyResult { provider: PROVIDER })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::prelude::*;

    fn settings(base_url: String) -> TrendsSettings {
        TrendsSettings {
            base_url,
            hl: "en-US".to_string(),
            tz: 360,
            geo: String::new(),
            timeout_seconds: 5,
        }
    }

    fn explore_body() -> String {
        format!(
            ")]}}'\n{}",
            serde_json::json!({
                "widgets": [
                    {"id": "GEO_MAP", "token": "geo-token", "request": {}},
                    {"id": "TIMESERIES", "token": "ts-token", "request": {"time": "2023-11-01 2024-11-01"}}
                ]
            })
        )
    }

    #[tokio::test]
    async fn test_interest_over_time_two_step_flow() {
        let server = MockServer::start();
        let explore_mock = server.mock(|when, then| {
            when.method(GET)
                .path(EXPLORE_PATH)
                .query_param("hl", "en-US")
                .query_param("tz", "360");
            then.status(200).body(explore_body());
        });
        let multiline_mock = server.mock(|when, then| {
            when.method(GET)
                .path(MULTILINE_PATH)
                .query_param("token", "ts-token");
            then.status(200).body(format!(
                ")]}}',\n{}",
                serde_json::json!({
                    "default": {"timelineData": [
                        {"time": "1704067200", "formattedTime": "Jan 1, 2024", "value": [40]},
                        {"time": "1704672000", "formattedTime": "Jan 8, 2024", "value": [100]},
                        {"time": "1705276800", "formattedTime": "Jan 15, 2024", "value": [75], "isPartial": true}
                    ]}
                })
            ));
        });

        let client = GoogleTrendsClient::new(settings(server.base_url()));
        let keyword = Keyword::parse("running shoes").unwrap();
        let result = client.interest_over_time(&keyword).await.unwrap();

        explore_mock.assert();
        multiline_mock.assert();
        assert_eq!(result.points().len(), 3);
        assert_eq!(
            result.points()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(result.peak().interest, 100);
    }

    #[tokio::test]
    async fn test_empty_timeline_is_empty_result() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(EXPLORE_PATH);
            then.status(200).body(explore_body());
        });
        server.mock(|when, then| {
            when.method(GET).path(MULTILINE_PATH);
            then.status(200)
                .body(")]}',\n{\"default\":{\"timelineData\":[]}}");
        });

        let client = GoogleTrendsClient::new(settings(server.base_url()));
        let keyword = Keyword::parse("xyzzynotaword").unwrap();
        let err = client.interest_over_time(&keyword).await.unwrap_err();

        assert!(matches!(err, ProviderError::EmptyResult { .. }));
    }

    #[tokio::test]
    async fn test_rate_limited_explore_maps_to_status() {
        let server = MockServer::start();
        let multiline_mock = server.mock(|when, then| {
            when.method(GET).path(MULTILINE_PATH);
            then.status(200).body("{}");
        });
        server.mock(|when, then| {
            when.method(GET).path(EXPLORE_PATH);
            then.status(429);
        });

        let client = GoogleTrendsClient::new(settings(server.base_url()));
        let keyword = Keyword::parse("running shoes").unwrap();
        let err = client.interest_over_time(&keyword).await.unwrap_err();

        assert!(matches!(err, ProviderError::Status { status: 429, .. }));
        multiline_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_missing_timeseries_widget_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path(EXPLORE_PATH);
            then.status(200).body(")]}'\n{\"widgets\":[]}");
        });

        let client = GoogleTrendsClient::new(settings(server.base_url()));
        let keyword = Keyword::parse("running shoes").unwrap();
        let err = client.interest_over_time(&keyword).await.unwrap_err();

        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn test_explore_request_uses_trailing_year() {
        let client = GoogleTrendsClient::new(settings("http://localhost".to_string()));
        let req = client.explore_request(&Keyword::parse("running shoes").unwrap());

        let item = &req["comparisonItem"][0];
        assert_eq!(item["keyword"], "running shoes");
        assert_eq!(item["time"], "today 12-m");
        assert_eq!(item["geo"], "");
    }

    #[tokio::test]
    async fn test_explore_call_sends_trailing_year_request() {
        let server = MockServer::start();
        let client = GoogleTrendsClient::new(settings(server.base_url()));
        let keyword = Keyword::parse("running shoes").unwrap();
        let expected = client.explore_request(&keyword).to_string();

        let explore_mock = server.mock(|when, then| {
            when.method(GET)
                .path(EXPLORE_PATH)
                .query_param("req", expected.as_str());
            then.status(200).body(explore_body());
        });

        let widget = client.timeseries_widget(&keyword).await.unwrap();

        explore_mock.assert();
        assert_eq!(widget.token.as_deref(), Some("ts-token"));
    }

    #[test]
    fn test_strip_xssi_prefix() {
        assert_eq!(strip_xssi_prefix(")]}',\n{\"a\":1}").unwrap(), "{\"a\":1}");
        assert_eq!(strip_xssi_prefix("{}").unwrap(), "{}");
        assert!(strip_xssi_prefix(")]}'").is_err());
    }

    #[test]
    fn test_parse_timeline_rejects_bad_timestamp() {
        let body = r#"{"default":{"timelineData":[{"time":"yesterday","value":[1]}]}}"#;
        assert!(matches!(
            parse_timeline(body),
            Err(ProviderError::Decode { .. })
        ));
    }
}
