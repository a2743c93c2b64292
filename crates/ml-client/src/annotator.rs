use async_trait::async_trait;
use report_core::{AnalysisError, Annotation, ArticleAnnotator, Sentiment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{check_status, MLError, MLResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationResponse {
    pub label: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct AnnotationRequest<'a> {
    text: &'a str,
}

/// Client for the sentiment and topic tagging service.
#[derive(Clone)]
pub struct AnnotatorClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnnotatorClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Raw service reply for one article's text
    pub async fn classify(&self, text: &str) -> MLResult<AnnotationResponse> {
        let response = self
            .client
            .post(format!("{}/annotate", self.base_url))
            .json(&AnnotationRequest { text })
            .send()
            .await?;

        let result = check_status(response).await?.json::<AnnotationResponse>().await?;
        Ok(result)
    }

    /// Check service health
    pub async fn health(&self) -> MLResult<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}

impl AnnotationResponse {
    pub fn into_annotation(self) -> MLResult<Annotation> {
        let sentiment: Sentiment = self
            .label
            .parse()
            .map_err(|e: AnalysisError| MLError::InvalidResponse(e.to_string()))?;

        Ok(Annotation {
            sentiment,
            topics: self
                .topics
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        })
    }
}

#[async_trait]
impl ArticleAnnotator for AnnotatorClient {
    async fn annotate(&self, text: &str) -> Result<Annotation, AnalysisError> {
        let annotation = self.classify(text).await?.into_annotation()?;
        Ok(annotation)
    }

    fn name(&self) -> &str {
        "annotator-service"
    }
}
