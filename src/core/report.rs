use crate::domain::model::{CompetitorResult, MetricsResult, Summary, TrendsResult};

pub const METRICS_HEADING: &str = "--- Keyword Metrics from Ahrefs ---";
pub const TRENDS_HEADING: &str = "--- Google Trends Data ---";
pub const COMPETITORS_HEADING: &str = "--- Competitor Data from SEMrush ---";
pub const SUMMARY_HEADING: &str = "--- SEO Strategy Summary ---";

/// Rows shown in the competitor section preview.
pub const COMPETITOR_PREVIEW_ROWS: usize = 5;

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Left-aligned columns separated by two spaces.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut lines = vec![format_row(headers, &widths)];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(&cells, &widths));
    }
    lines
}

fn section(heading: &str, body: Vec<String>) -> String {
    let mut lines = vec![heading.to_string()];
    lines.extend(body);
    lines.join("\n")
}

pub fn render_metrics_section(metrics: &MetricsResult) -> String {
    let rows = vec![vec![
        metrics.keyword.to_string(),
        metrics.volume.to_string(),
        metrics.difficulty.to_string(),
        metrics.clicks.to_string(),
    ]];
    section(
        METRICS_HEADING,
        render_table(&["keyword", "volume", "difficulty", "clicks"], &rows),
    )
}

pub fn render_trends_section(trends: &TrendsResult) -> String {
    let rows: Vec<Vec<String>> = trends
        .points()
        .iter()
        .map(|p| vec![p.date.format("%Y-%m-%d").to_string(), p.interest.to_string()])
        .collect();
    section(TRENDS_HEADING, render_table(&["date", "interest"], &rows))
}

pub fn render_competitor_section(competitors: &CompetitorResult) -> String {
    let rows: Vec<Vec<String>> = competitors
        .records
        .iter()
        .take(COMPETITOR_PREVIEW_ROWS)
        .map(|r| {
            vec![
                r.phrase.clone(),
                r.search_volume.to_string(),
                r.database.clone(),
            ]
        })
        .collect();

    let mut body = render_table(&["phrase", "search_volume", "database"], &rows);
    let hidden = competitors
        .records
        .len()
        .saturating_sub(COMPETITOR_PREVIEW_ROWS);
    if hidden > 0 {
        body.push(format!("... {} more rows", hidden));
    }
    section(COMPETITORS_HEADING, body)
}

impl Summary {
    /// One line per present field, in report order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(volume) = &self.volume {
            lines.push(format!("Keyword Volume: {}", volume));
        }
        if let Some(difficulty) = &self.difficulty {
            lines.push(format!("Keyword Difficulty: {}", difficulty));
        }
        if let Some(insight) = &self.trend_insight {
            lines.push(format!(
                "Trend Insights: Check seasonal peaks for '{}'",
                insight.keyword
            ));
            lines.push(format!(
                "Peak Interest: {} ({})",
                insight.peak.date.format("%Y-%m-%d"),
                insight.peak.interest
            ));
        }
        if let Some(phrases) = &self.top_competitors {
            lines.push(format!("Top Competitors Analyzed: {}", phrases.join(", ")));
        }

        lines
    }
}

/// The summary heading is always printed, even with every slot absent.
pub fn render_summary(summary: &Summary) -> String {
    section(SUMMARY_HEADING, summary.lines())
}
