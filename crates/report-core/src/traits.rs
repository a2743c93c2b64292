use async_trait::async_trait;
use std::path::PathBuf;

use crate::{AnalysisError, Annotation, AudioSegment, RawArticle};

/// Source of raw news articles about a company
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch articles matching `company`. An empty vector means "no matches".
    async fn fetch(&self, company: &str, api_key: &str) -> Result<Vec<RawArticle>, AnalysisError>;

    fn name(&self) -> &str;
}

/// Sentiment and topic tagging for a single article's text
#[async_trait]
pub trait ArticleAnnotator: Send + Sync {
    async fn annotate(&self, text: &str) -> Result<Annotation, AnalysisError>;

    fn name(&self) -> &str;
}

/// Text-to-speech backend producing a playable audio artifact
#[async_trait]
pub trait AudioSynthesizer: Send + Sync {
    /// Returns the path of the generated audio file.
    async fn synthesize(
        &self,
        segments: &[AudioSegment],
        company: &str,
    ) -> Result<PathBuf, AnalysisError>;

    fn name(&self) -> &str;
}
