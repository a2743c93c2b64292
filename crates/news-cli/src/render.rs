//! Plain-text rendering of reports and power forecasts for the terminal.

use power_forecast::{feature_labels, PowerPrediction, SolarConditions};
use report_core::{Report, Sentiment};
use std::fmt::Write;

const BAR_WIDTH: usize = 30;
const RULE: &str = "────────────────────────────────────────────────────────────";

fn severity(outlook: Sentiment) -> &'static str {
    match outlook {
        Sentiment::Positive => "[success]",
        Sentiment::Negative => "[error]",
        Sentiment::Neutral => "[info]",
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, RULE);
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH + max / 2) / max;
    let len = if count > 0 { len.max(1) } else { 0 };
    "█".repeat(len)
}

fn join_topics<'a>(topics: impl IntoIterator<Item = &'a String>) -> String {
    let joined = topics.into_iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

/// Full report as shown by `newspulse report`.
pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    let dist = &report.sentiment_distribution;

    let _ = writeln!(out, "News Sentiment Analysis: {}", report.company);
    let _ = writeln!(out, "Generated {}", report.generated_at.format("%Y-%m-%d %H:%M UTC"));

    heading(&mut out, "Summary");
    let _ = writeln!(
        out,
        "Positive: {}   Negative: {}   Neutral: {}",
        dist.positive, dist.negative, dist.neutral
    );
    let _ = writeln!(out, "{} {}", severity(report.outlook), report.final_verdict);

    heading(&mut out, "Articles");
    for (i, article) in report.articles.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", i + 1, article.title, article.sentiment);
        let _ = writeln!(out, "   {}", article.summary);
        if article.has_link() {
            let _ = writeln!(out, "   Read more: {}", article.url);
        } else {
            let _ = writeln!(out, "   Original article URL not available");
        }
        let _ = writeln!(out, "   Topics: {}", join_topics(&article.topics));
    }

    heading(&mut out, "Sentiment Distribution");
    let max = dist.entries().iter().map(|(_, c)| *c).max().unwrap_or(0);
    for (sentiment, count) in dist.entries() {
        let _ = writeln!(out, "{:<9} {:<width$} {}", sentiment.to_label(), bar(count, max), count, width = BAR_WIDTH);
    }
    let shares = dist
        .ratios()
        .iter()
        .map(|(s, pct)| format!("{} {:.1}%", s, pct))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "Share: {}", shares);

    heading(&mut out, "Coverage Differences");
    if report.coverage_differences.is_empty() {
        let _ = writeln!(out, "No coverage comparisons.");
    }
    for diff in &report.coverage_differences {
        let _ = writeln!(out, "- {}", diff.comparison);
        let _ = writeln!(out, "  Impact: {}", diff.impact);
    }

    heading(&mut out, "Topic Analysis");
    let _ = writeln!(out, "Common topics: {}", join_topics(&report.topic_overlap.common_topics));
    for unique in &report.topic_overlap.unique_topics {
        let _ = writeln!(out, "{} unique: {}", unique.article, join_topics(&unique.topics));
    }

    if let Some(path) = &report.audio_path {
        heading(&mut out, "Audio Summary");
        let _ = writeln!(out, "Saved to {}", path.display());
    }

    out
}

/// Inputs and result of one power forecast.
pub fn render_prediction(conditions: &SolarConditions, prediction: &PowerPrediction) -> String {
    let mut out = String::new();
    let labels = feature_labels();
    let values = [
        format!("{:.2}", conditions.distance_to_solar_noon()),
        conditions.temperature().to_string(),
        conditions.wind_direction().to_string(),
        format!("{:.1}", conditions.wind_speed()),
        conditions.sky_cover().to_string(),
        conditions.humidity().to_string(),
        format!("{:.1}", conditions.average_wind_speed()),
        format!("{:.2}", conditions.average_pressure()),
    ];

    let _ = writeln!(out, "Solar Power Prediction");
    heading(&mut out, "Inputs");
    for (label, value) in labels.iter().zip(values.iter()) {
        let _ = writeln!(out, "{:<20} {}", label, value);
    }

    heading(&mut out, "Prediction");
    let _ = writeln!(out, "Predicted Power Output: {:.2} MW", prediction.power_output);
    let _ = writeln!(out, "Efficiency: {:.1}%", prediction.efficiency_pct);
    let _ = writeln!(out, "Generation Status: {}", prediction.status);
    let _ = writeln!(out, "Model: {}", prediction.model);
    out
}
