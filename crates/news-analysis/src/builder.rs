use chrono::{DateTime, Utc};
use report_core::{AnalysisError, Article, Report, SentimentDistribution};

use crate::narrative::coverage_differences;
use crate::topics::topic_overlap;
use crate::verdict::{outlook, verdict_text};

/// Pairwise comparisons kept per report unless configured otherwise
pub const DEFAULT_MAX_COMPARISONS: usize = 10;

/// Assembles the aggregate report from annotated articles.
///
/// `build` is a pure function of its arguments: the timestamp is passed in,
/// sets are ordered, and comparison pairs are enumerated in a fixed order, so
/// identical input always yields an identical `Report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportBuilder {
    max_comparisons: usize,
}

impl ReportBuilder {
    pub fn new(max_comparisons: usize) -> Self {
        Self { max_comparisons }
    }

    pub fn max_comparisons(&self) -> usize {
        self.max_comparisons
    }

    pub fn build(
        &self,
        articles: &[Article],
        company: &str,
        generated_at: DateTime<Utc>,
    ) -> Result<Report, AnalysisError> {
        if articles.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let sentiment_distribution = SentimentDistribution::from_articles(articles);
        let outlook = outlook(&sentiment_distribution);

        Ok(Report {
            company: company.to_string(),
            articles: articles.to_vec(),
            sentiment_distribution,
            final_verdict: verdict_text(company, outlook),
            outlook,
            coverage_differences: coverage_differences(articles, company, self.max_comparisons),
            topic_overlap: topic_overlap(articles),
            audio_path: None,
            generated_at,
        })
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMPARISONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use report_core::Sentiment;
    use std::collections::BTreeSet;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn article(sentiment: Sentiment, topics: &[&str]) -> Article {
        Article::new(
            "Headline",
            Some("https://news.example.com/a".to_string()),
            "Summary",
            sentiment,
            topics.iter().map(|t| t.to_string()),
        )
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let result = ReportBuilder::default().build(&[], "Tesla", at());
        assert_eq!(result, Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn test_two_article_example() {
        let articles = vec![
            article(Sentiment::Positive, &["EV", "battery"]),
            article(Sentiment::Negative, &["battery", "recall"]),
        ];
        let report = ReportBuilder::default().build(&articles, "Tesla", at()).unwrap();

        assert_eq!(report.company, "Tesla");
        assert_eq!(report.sentiment_distribution.positive, 1);
        assert_eq!(report.sentiment_distribution.negative, 1);
        assert_eq!(report.sentiment_distribution.neutral, 0);
        assert_eq!(report.outlook, Sentiment::Neutral);
        assert!(report.final_verdict.contains("mixed or neutral"));
        assert_eq!(report.topic_overlap.common_topics, set(&["battery"]));
        assert_eq!(report.topic_overlap.unique_topics[0].topics, set(&["EV"]));
        assert_eq!(report.topic_overlap.unique_topics[1].topics, set(&["recall"]));
        assert_eq!(report.coverage_differences.len(), 1);
        assert!(report.audio_path.is_none());
        assert_eq!(report.generated_at, at());
    }

    #[test]
    fn test_distribution_sums_to_article_count() {
        let sentiments = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];
        for n in 1..=12 {
            let articles: Vec<Article> = (0..n)
                .map(|i| article(sentiments[(i * 7 + n) % 3], &[]))
                .collect();
            let report = ReportBuilder::default().build(&articles, "Acme", at()).unwrap();
            assert_eq!(report.sentiment_distribution.total(), articles.len());
        }
    }

    #[test]
    fn test_positive_majority_verdict() {
        let articles = vec![
            article(Sentiment::Positive, &[]),
            article(Sentiment::Positive, &[]),
            article(Sentiment::Negative, &[]),
        ];
        let report = ReportBuilder::default().build(&articles, "Apple", at()).unwrap();
        assert_eq!(report.outlook, Sentiment::Positive);
        assert!(report.final_verdict.contains("positive"));
    }

    #[test]
    fn test_comparisons_are_capped() {
        let articles: Vec<Article> = (0..8).map(|_| article(Sentiment::Neutral, &[])).collect();

        let capped = ReportBuilder::new(5).build(&articles, "Acme", at()).unwrap();
        assert_eq!(capped.coverage_differences.len(), 5);

        // 8 articles have 28 pairs
        let uncapped = ReportBuilder::new(usize::MAX).build(&articles, "Acme", at()).unwrap();
        assert_eq!(uncapped.coverage_differences.len(), 28);
    }

    #[test]
    fn test_single_article_has_no_comparisons() {
        let report = ReportBuilder::default()
            .build(&[article(Sentiment::Negative, &["lawsuit"])], "Acme", at())
            .unwrap();
        assert!(report.coverage_differences.is_empty());
        assert_eq!(report.outlook, Sentiment::Negative);
    }

    #[test]
    fn test_build_is_idempotent() {
        let articles = vec![
            article(Sentiment::Positive, &["AI", "chips"]),
            article(Sentiment::Neutral, &["chips"]),
            article(Sentiment::Negative, &["export", "AI"]),
        ];
        let builder = ReportBuilder::default();
        let first = builder.build(&articles, "Nvidia", at()).unwrap();
        let second = builder.build(&articles, "Nvidia", at()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
