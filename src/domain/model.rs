use crate::utils::error::{Result, SeoError};
use chrono::NaiveDate;
use std::fmt;

/// The single query parameter shared by every provider during one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword(String);

impl Keyword {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SeoError::ValidationError {
                message: "keyword cannot be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A numeric provider field that may be missing from the response.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(serde_json::Number),
    Unknown,
}

impl MetricValue {
    pub fn from_json(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Number(n)) => MetricValue::Number(n.clone()),
            Some(serde_json::Value::String(s)) => s
                .trim()
                .parse::<serde_json::Number>()
                .map(MetricValue::Number)
                .unwrap_or(MetricValue::Unknown),
            _ => MetricValue::Unknown,
        }
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Number(value.into())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Unknown => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsResult {
    pub keyword: Keyword,
    pub volume: MetricValue,
    pub difficulty: MetricValue,
    pub clicks: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub interest: u32,
}

/// Interest over time for the trailing window, oldest first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendsResult {
    points: Vec<TrendPoint>,
}

impl TrendsResult {
    /// Returns `None` for an empty series so an empty result can never
    /// occupy a report slot.
    pub fn new(points: Vec<TrendPoint>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    pub fn points(&self) -> &[TrendPoint] {
        &self.points
    }

    /// Highest interest value; the earliest date wins ties.
    pub fn peak(&self) -> &TrendPoint {
        let mut peak = &self.points[0];
        for point in &self.points[1..] {
            if point.interest > peak.interest {
                peak = point;
            }
        }
        peak
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorRecord {
    pub phrase: String,
    pub search_volume: MetricValue,
    pub database: String,
}

/// Competitor rows in the order the provider returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitorResult {
    pub records: Vec<CompetitorRecord>,
}

impl CompetitorResult {
    pub fn top_phrases(&self, n: usize) -> Vec<&str> {
        self.records
            .iter()
            .take(n)
            .map(|r| r.phrase.as_str())
            .collect()
    }
}

/// One run's combined view. Each slot is filled only when its provider
/// produced data.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub keyword: Keyword,
    pub metrics: Option<MetricsResult>,
    pub trends: Option<TrendsResult>,
    pub competitors: Option<CompetitorResult>,
}

pub const SUMMARY_COMPETITOR_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendInsight {
    pub keyword: Keyword,
    pub peak: TrendPoint,
}

/// Summary fields drawn from present slots only.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub volume: Option<MetricValue>,
    pub difficulty: Option<MetricValue>,
    pub trend_insight: Option<TrendInsight>,
    pub top_competitors: Option<Vec<String>>,
}

impl Report {
    pub fn empty(keyword: Keyword) -> Self {
        Self {
            keyword,
            metrics: None,
            trends: None,
            competitors: None,
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            volume: self.metrics.as_ref().map(|m| m.volume.clone()),
            difficulty: self.metrics.as_ref().map(|m| m.difficulty.clone()),
            trend_insight: self.trends.as_ref().map(|t| TrendInsight {
                keyword: self.keyword.clone(),
                peak: t.peak().clone(),
            }),
            top_competitors: self.competitors.as_ref().map(|c| {
                c.top_phrases(SUMMARY_COMPETITOR_LIMIT)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            }),
        }
    }

    pub fn present_slots(&self) -> usize {
        [
            self.metrics.is_some(),
            self.trends.is_some(),
            self.competitors.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}
