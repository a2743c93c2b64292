use report_core::{audio_file_name, AnalysisError, Article, AudioSegment, AudioSynthesizer, Report};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Longest summary (in characters) read out per article
pub const DEFAULT_SUMMARY_CHARS: usize = 300;

const ELLIPSIS: &str = "...";

/// Cut `summary` to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_summary(summary: &str, max_chars: usize) -> String {
    match summary.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &summary[..byte_idx], ELLIPSIS),
        None => summary.to_string(),
    }
}

pub fn audio_segments(articles: &[Article], max_chars: usize) -> Vec<AudioSegment> {
    articles
        .iter()
        .map(|a| AudioSegment {
            title: a.title.clone(),
            summary: truncate_summary(&a.summary, max_chars),
        })
        .collect()
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Generates the spoken summary at most once per company, reusing the
/// cached file when it is already on disk.
pub struct AudioSynthesisCoordinator {
    synthesizer: Arc<dyn AudioSynthesizer>,
    cache_dir: PathBuf,
    summary_chars: usize,
}

impl AudioSynthesisCoordinator {
    pub fn new(synthesizer: Arc<dyn AudioSynthesizer>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            synthesizer,
            cache_dir: cache_dir.into(),
            summary_chars: DEFAULT_SUMMARY_CHARS,
        }
    }

    pub fn with_summary_chars(mut self, summary_chars: usize) -> Self {
        self.summary_chars = summary_chars;
        self
    }

    pub fn cache_path(&self, company: &str) -> PathBuf {
        self.cache_dir.join(audio_file_name(company))
    }

    /// Attach an audio summary to `report`, synthesising only on a cache miss.
    pub async fn ensure_audio(&self, report: &mut Report) -> Result<PathBuf, AnalysisError> {
        let candidate = report
            .audio_path
            .clone()
            .unwrap_or_else(|| self.cache_path(&report.company));

        if file_exists(&candidate).await {
            info!(company = %report.company, path = %candidate.display(), "Reusing cached audio summary");
            report.audio_path = Some(candidate.clone());
            return Ok(candidate);
        }

        let segments = audio_segments(&report.articles, self.summary_chars);
        info!(
            company = %report.company,
            segments = segments.len(),
            backend = self.synthesizer.name(),
            "Synthesizing audio summary"
        );

        let path = self
            .synthesizer
            .synthesize(&segments, &report.company)
            .await
            .map_err(|e| match e {
                AnalysisError::Synthesis(_) => e,
                other => AnalysisError::Synthesis(other.to_string()),
            })?;

        if !file_exists(&path).await {
            warn!(path = %path.display(), "Synthesizer reported success but no file exists");
            return Err(AnalysisError::Synthesis(
                "audio file could not be generated".to_string(),
            ));
        }

        report.audio_path = Some(path.clone());
        Ok(path)
    }

    /// Bytes of the report's audio file, for playback or download
    pub async fn read_audio(&self, report: &Report) -> Result<Vec<u8>, AnalysisError> {
        let path = report
            .audio_path
            .as_ref()
            .ok_or_else(|| AnalysisError::Synthesis("no audio summary attached".to_string()))?;

        tokio::fs::read(path)
            .await
            .map_err(|e| AnalysisError::Synthesis(format!("{}: {}", path.display(), e)))
    }
}
