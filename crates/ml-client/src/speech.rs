use async_trait::async_trait;
use report_core::{audio_file_name, AnalysisError, AudioSegment, AudioSynthesizer};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{check_status, MLError, MLResult};

#[derive(Debug, Clone, Serialize)]
struct SynthesisRequest<'a> {
    company: &'a str,
    language: &'a str,
    segments: &'a [AudioSegment],
}

/// Client for the text-to-speech service. Audio comes back as MP3 bytes and
/// is stored under the cache directory, one file per company.
#[derive(Clone)]
pub struct SpeechClient {
    client: reqwest::Client,
    base_url: String,
    language: String,
    cache_dir: PathBuf,
}

impl SpeechClient {
    pub fn new(base_url: String, language: String, cache_dir: PathBuf, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            language,
            cache_dir,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Request audio for `segments` and return the raw bytes
    pub async fn render(&self, segments: &[AudioSegment], company: &str) -> MLResult<Vec<u8>> {
        let request = SynthesisRequest {
            company,
            language: &self.language,
            segments,
        };

        let response = self
            .client
            .post(format!("{}/synthesize", self.base_url))
            .json(&request)
            .send()
            .await?;

        let bytes = check_status(response).await?.bytes().await?;
        if bytes.is_empty() {
            return Err(MLError::InvalidResponse("empty audio payload".to_string()));
        }
        Ok(bytes.to_vec())
    }

    /// Render and write the company's audio file, returning its path
    pub async fn render_to_file(&self, segments: &[AudioSegment], company: &str) -> MLResult<PathBuf> {
        let audio = self.render(segments, company).await?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let path = self.cache_dir.join(audio_file_name(company));
        tokio::fs::write(&path, &audio).await?;

        tracing::info!("Wrote {} bytes of audio to {}", audio.len(), path.display());
        Ok(path)
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

#[async_trait]
impl AudioSynthesizer for SpeechClient {
    async fn synthesize(&self, segments: &[AudioSegment], company: &str) -> Result<PathBuf, AnalysisError> {
        self.render_to_file(segments, company)
            .await
            .map_err(|e| AnalysisError::Synthesis(e.to_string()))
    }

    fn name(&self) -> &str {
        "speech-service"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    async fn synthesize(Json(body): Json<Value>) -> (StatusCode, Vec<u8>) {
        if body["language"] != "hi" {
            return (StatusCode::BAD_REQUEST, b"unsupported language".to_vec());
        }
        let segments = body["segments"].as_array().map(|s| s.len()).unwrap_or(0);
        (StatusCode::OK, format!("ID3 audio for {} segments", segments).into_bytes())
    }

    fn segments() -> Vec<AudioSegment> {
        vec![
            AudioSegment {
                title: "Tesla shares climb".to_string(),
                summary: "Deliveries topped estimates.".to_string(),
            },
            AudioSegment {
                title: "Tesla recall widens".to_string(),
                summary: "More vehicles affected.".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_synthesize_writes_cache_file() {
        let base = spawn(Router::new().route("/synthesize", post(synthesize))).await;
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("audio");
        let client = SpeechClient::new(base, "hi".to_string(), cache.clone(), Duration::from_secs(5));

        let path = client.synthesize(&segments(), "Tesla Inc.").await.unwrap();
        assert_eq!(path, cache.join("Tesla_Inc_news_summary.mp3"));

        let written = tokio::fs::read(&path).await.unwrap();
        assert_eq!(written, b"ID3 audio for 2 segments");
    }

    #[tokio::test]
    async fn test_rejected_request_is_synthesis_error() {
        let base = spawn(Router::new().route("/synthesize", post(synthesize))).await;
        let dir = tempfile::tempdir().unwrap();
        let client = SpeechClient::new(base, "fr".to_string(), dir.path().to_path_buf(), Duration::from_secs(5));

        let err = client.synthesize(&segments(), "Tesla").await.unwrap_err();
        match err {
            AnalysisError::Synthesis(msg) => assert!(msg.contains("400")),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(!dir.path().join("Tesla_news_summary.mp3").exists());
    }
}
