use chrono::Utc;
use report_core::{AnalysisError, Article, ArticleAnnotator, NewsSource, Report};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::audio::AudioSynthesisCoordinator;
use crate::builder::ReportBuilder;

/// One user-initiated analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub company: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub include_audio: bool,
}

/// Company name and credential after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub company: String,
    pub api_key: String,
    pub include_audio: bool,
}

impl AnalysisRequest {
    /// Trim both fields and reject blanks before any work starts.
    pub fn validate(&self, fallback_key: Option<&str>) -> Result<ValidatedRequest, AnalysisError> {
        let company = self.company.trim();
        if company.is_empty() {
            return Err(AnalysisError::InputValidation(
                "Please enter a company name".to_string(),
            ));
        }

        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or_else(|| fallback_key.map(str::trim).filter(|k| !k.is_empty()))
            .ok_or_else(|| AnalysisError::InputValidation("API key is required".to_string()))?;

        Ok(ValidatedRequest {
            company: company.to_string(),
            api_key: api_key.to_string(),
            include_audio: self.include_audio,
        })
    }
}

/// A finished report plus the audio failure, if synthesis was attempted and failed
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: Report,
    pub audio_error: Option<AnalysisError>,
}

/// fetch → annotate → build → (audio), run sequentially for one request
pub struct AnalysisPipeline {
    source: Arc<dyn NewsSource>,
    annotator: Arc<dyn ArticleAnnotator>,
    builder: ReportBuilder,
    audio: Option<AudioSynthesisCoordinator>,
    default_api_key: Option<String>,
}

impl AnalysisPipeline {
    pub fn new(source: Arc<dyn NewsSource>, annotator: Arc<dyn ArticleAnnotator>) -> Self {
        Self {
            source,
            annotator,
            builder: ReportBuilder::default(),
            audio: None,
            default_api_key: None,
        }
    }

    pub fn with_builder(mut self, builder: ReportBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_audio(mut self, audio: AudioSynthesisCoordinator) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Credential used when a request does not carry its own
    pub fn with_default_api_key(mut self, api_key: Option<String>) -> Self {
        self.default_api_key = api_key;
        self
    }

    pub fn audio(&self) -> Option<&AudioSynthesisCoordinator> {
        self.audio.as_ref()
    }

    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        let request = request.validate(self.default_api_key.as_deref())?;
        let started = Instant::now();

        info!(company = %request.company, source = self.source.name(), "Fetching news");
        let raw = self.source.fetch(&request.company, &request.api_key).await?;
        if raw.is_empty() {
            return Err(AnalysisError::EmptyResult(request.company));
        }
        info!(company = %request.company, articles = raw.len(), "Fetched articles");

        let mut articles = Vec::with_capacity(raw.len());
        for item in &raw {
            let annotation = self.annotator.annotate(&item.analysis_text()).await?;
            articles.push(Article::annotated(item, annotation));
        }

        let mut report = self.builder.build(&articles, &request.company, Utc::now())?;
        info!(
            company = %report.company,
            positive = report.sentiment_distribution.positive,
            negative = report.sentiment_distribution.negative,
            neutral = report.sentiment_distribution.neutral,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Report built"
        );

        let mut audio_error = None;
        if request.include_audio {
            match &self.audio {
                Some(coordinator) => {
                    if let Err(e) = coordinator.ensure_audio(&mut report).await {
                        warn!(company = %report.company, "Audio summary unavailable: {}", e);
                        audio_error = Some(e);
                    }
                }
                None => {
                    audio_error = Some(AnalysisError::Synthesis(
                        "no speech backend configured".to_string(),
                    ));
                }
            }
        }

        Ok(AnalysisOutcome { report, audio_error })
    }
}
