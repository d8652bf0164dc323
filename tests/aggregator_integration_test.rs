use httpmock::prelude::*;
use httpmock::Mock;
use seo_planner::utils::validation::Validate;
use seo_planner::{Aggregator, AppConfig, Keyword};

const AHREFS_PATH: &str = "/ahrefs/";
const SEMRUSH_PATH: &str = "/semrush/";
const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default()
        .with_credentials("ahrefs-token", "semrush-key")
        .with_timeout(5);
    config.metrics.endpoint = server.url(AHREFS_PATH);
    config.trends.base_url = server.base_url();
    config.competitors.endpoint = server.url(SEMRUSH_PATH);
    config
}

fn mock_trends<'a>(server: &'a MockServer, timeline: serde_json::Value) -> (Mock<'a>, Mock<'a>) {
    let explore = server.mock(|when, then| {
        when.method(GET).path(EXPLORE_PATH);
        then.status(200).body(format!(
            ")]}}'\n{}",
            serde_json::json!({
                "widgets": [{"id": "TIMESERIES", "token": "ts-token", "request": {"time": "today 12-m"}}]
            })
        ));
    });
    let multiline = server.mock(|when, then| {
        when.method(GET)
            .path(MULTILINE_PATH)
            .query_param("token", "ts-token");
        then.status(200).body(format!(
            ")]}}',\n{}",
            serde_json::json!({"default": {"timelineData": timeline}})
        ));
    });
    (explore, multiline)
}

fn semrush_rows(n: usize) -> String {
    let mut body = String::from("Keyword;Search Volume;Database\r\n");
    for i in 1..=n {
        body.push_str(&format!("running shoes variant {};{};us\r\n", i, 1000 - i));
    }
    body
}

#[tokio::test]
async fn test_full_report_from_all_providers() {
    let server = MockServer::start();
    let ahrefs = server.mock(|when, then| {
        when.method(GET)
            .path(AHREFS_PATH)
            .query_param("target", "running shoes")
            .query_param("token", "ahrefs-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"volume": 1000, "difficulty": 45, "clicks": 600}));
    });
    let (explore, multiline) = mock_trends(
        &server,
        serde_json::json!([
            {"time": "1704067200", "value": [55]},
            {"time": "1704672000", "value": [100]},
            {"time": "1705276800", "value": [80], "isPartial": true}
        ]),
    );
    let semrush = server.mock(|when, then| {
        when.method(GET)
            .path(SEMRUSH_PATH)
            .query_param("phrase", "running shoes")
            .query_param("key", "semrush-key");
        then.status(200).body(semrush_rows(3));
    });

    let config = config_for(&server);
    assert!(config.validate().is_ok());

    let aggregator = Aggregator::from_config(&config);
    let keyword = Keyword::parse("running shoes").unwrap();
    let mut out = Vec::new();
    let report = aggregator.run(&keyword, &mut out).await.unwrap();

    ahrefs.assert();
    explore.assert();
    multiline.assert();
    semrush.assert();

    assert_eq!(report.present_slots(), 3);
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("--- Keyword Metrics from Ahrefs ---"));
    assert!(output.contains("--- Google Trends Data ---"));
    assert!(output.contains("2024-01-08  100"));
    assert!(output.contains("--- Competitor Data from SEMrush ---"));
    assert!(output.contains("Keyword Volume: 1000"));
    assert!(output.contains("Keyword Difficulty: 45"));
    assert!(output.contains("Trend Insights: Check seasonal peaks for 'running shoes'"));
    assert!(output.contains("Peak Interest: 2024-01-08 (100)"));
    assert!(output.contains(
        "Top Competitors Analyzed: running shoes variant 1, running shoes variant 2, running shoes variant 3"
    ));
}

#[tokio::test]
async fn test_all_providers_failing_still_prints_summary() {
    let server = MockServer::start();
    let ahrefs = server.mock(|when, then| {
        when.method(GET).path(AHREFS_PATH);
        then.status(401);
    });
    let (explore, multiline) = mock_trends(&server, serde_json::json!([]));
    let semrush = server.mock(|when, then| {
        when.method(GET).path(SEMRUSH_PATH);
        then.status(200).body("ERROR 50 :: NOTHING FOUND");
    });

    let aggregator = Aggregator::from_config(&config_for(&server));
    let keyword = Keyword::parse("xyzzynotaword").unwrap();
    let mut out = Vec::new();
    let report = aggregator.run(&keyword, &mut out).await.unwrap();

    ahrefs.assert();
    explore.assert();
    multiline.assert();
    semrush.assert();

    assert!(report.metrics.is_none());
    assert!(report.trends.is_none());
    assert!(report.competitors.is_none());

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output, "\n--- SEO Strategy Summary ---\n");
}

#[tokio::test]
async fn test_unreachable_provider_does_not_stop_the_run() {
    let server = MockServer::start();
    let (_explore, _multiline) = mock_trends(
        &server,
        serde_json::json!([{"time": "1704067200", "value": [12]}]),
    );
    let semrush = server.mock(|when, then| {
        when.method(GET).path(SEMRUSH_PATH);
        then.status(200).body(semrush_rows(8));
    });

    let mut config = config_for(&server);
    // Nothing listens on port 9 on the loopback interface.
    config.metrics.endpoint = "http://127.0.0.1:9/".to_string();

    let aggregator = Aggregator::from_config(&config);
    let keyword = Keyword::parse("running shoes").unwrap();
    let report = aggregator.collect(&keyword).await;

    semrush.assert();
    assert!(report.metrics.is_none());
    assert!(report.trends.is_some());

    let phrases = report.summary().top_competitors.unwrap();
    assert_eq!(phrases.len(), 5);
    assert_eq!(phrases[0], "running shoes variant 1");
    assert_eq!(phrases[4], "running shoes variant 5");
}

#[tokio::test]
async fn test_same_responses_give_identical_reports() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(AHREFS_PATH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"volume": 1000, "difficulty": 45}));
    });
    mock_trends(
        &server,
        serde_json::json!([{"time": "1704067200", "value": [30]}]),
    );
    server.mock(|when, then| {
        when.method(GET).path(SEMRUSH_PATH);
        then.status(500);
    });

    let aggregator = Aggregator::from_config(&config_for(&server));
    let keyword = Keyword::parse("running shoes").unwrap();

    let first = aggregator.collect(&keyword).await;
    let second = aggregator.collect(&keyword).await;

    assert_eq!(first, second);
    assert!(first.competitors.is_none());
    assert_eq!(first.summary().volume.unwrap().to_string(), "1000");
    assert_eq!(first.summary().difficulty.unwrap().to_string(), "45");
}
