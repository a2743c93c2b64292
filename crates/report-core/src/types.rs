use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::AnalysisError;

/// Placeholder stored when the provider gives no article URL
pub const MISSING_URL: &str = "#";

/// Article sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn to_label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Lowercase form used inside generated sentences
    pub fn adjective(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

impl FromStr for Sentiment {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(AnalysisError::InvalidData(format!(
                "unknown sentiment label '{}'",
                other
            ))),
        }
    }
}

/// Article as returned by the news provider, before annotation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl RawArticle {
    /// Text handed to the annotator: title, description and body, in that order.
    pub fn analysis_text(&self) -> String {
        [
            Some(self.title.as_str()),
            self.description.as_deref(),
            self.content.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Description, falling back to the body and finally the title.
    pub fn summary(&self) -> String {
        [self.description.as_deref(), self.content.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(self.title.trim())
            .to_string()
    }
}

/// Output of the annotator for one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub sentiment: Sentiment,
    pub topics: BTreeSet<String>,
}

/// One annotated news item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub sentiment: Sentiment,
    pub topics: BTreeSet<String>,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        url: Option<String>,
        summary: impl Into<String>,
        sentiment: Sentiment,
        topics: impl IntoIterator<Item = String>,
    ) -> Self {
        let url = url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| MISSING_URL.to_string());

        Self {
            title: title.into(),
            url,
            summary: summary.into(),
            sentiment,
            topics: topics.into_iter().collect(),
        }
    }

    pub fn annotated(raw: &RawArticle, annotation: Annotation) -> Self {
        Self::new(
            raw.title.trim(),
            raw.url.clone(),
            raw.summary(),
            annotation.sentiment,
            annotation.topics,
        )
    }

    /// False when the provider had no URL for this article
    pub fn has_link(&self) -> bool {
        !self.url.is_empty() && self.url != MISSING_URL
    }
}

/// Count of articles per sentiment label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn from_articles(articles: &[Article]) -> Self {
        let mut dist = Self::default();
        for article in articles {
            dist.record(article.sentiment);
        }
        dist
    }

    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// (label, count) pairs in display order: Positive, Negative, Neutral
    pub fn entries(&self) -> [(Sentiment, usize); 3] {
        Sentiment::ALL.map(|s| (s, self.get(s)))
    }

    /// Share of each label in percent; all zeros for an empty distribution.
    pub fn ratios(&self) -> [(Sentiment, f64); 3] {
        let total = self.total();
        Sentiment::ALL.map(|s| {
            let pct = if total == 0 {
                0.0
            } else {
                self.get(s) as f64 / total as f64 * 100.0
            };
            (s, pct)
        })
    }
}

/// Narrated contrast between two articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageDifference {
    pub comparison: String,
    pub impact: String,
}

/// Topics that no other article mentions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueTopics {
    pub article: String,
    pub topics: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicOverlap {
    pub common_topics: BTreeSet<String>,
    pub unique_topics: Vec<UniqueTopics>,
}

/// Aggregate analysis for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub company: String,
    pub articles: Vec<Article>,
    pub sentiment_distribution: SentimentDistribution,
    pub final_verdict: String,
    /// Direction the verdict points in; Neutral covers ties
    pub outlook: Sentiment,
    pub coverage_differences: Vec<CoverageDifference>,
    pub topic_overlap: TopicOverlap,
    #[serde(default)]
    pub audio_path: Option<PathBuf>,
    pub generated_at: DateTime<Utc>,
}

/// Title plus shortened summary, one per article, spoken in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSegment {
    pub title: String,
    pub summary: String,
}

/// Filesystem-safe form of a company name: ASCII alphanumerics kept,
/// every other run of characters collapsed into one underscore.
pub fn company_slug(company: &str) -> String {
    let mut slug = String::with_capacity(company.len());
    let mut pending_sep = false;
    for c in company.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("company");
    }
    slug
}

/// Name of the cached audio summary for a company
pub fn audio_file_name(company: &str) -> String {
    format!("{}_news_summary.mp3", company_slug(company))
}
