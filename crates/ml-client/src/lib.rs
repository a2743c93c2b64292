pub mod annotator;
pub mod error;
pub mod power;
pub mod speech;

pub use annotator::AnnotatorClient;
pub use error::{MLError, MLResult};
pub use power::PowerModelClient;
pub use speech::SpeechClient;

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for ML services
#[derive(Debug, Clone)]
pub struct MLConfig {
    pub annotator_url: String,
    pub tts_url: String,
    pub power_url: String,
    pub tts_language: String,
    pub audio_cache_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for MLConfig {
    fn default() -> Self {
        Self {
            annotator_url: std::env::var("ML_ANNOTATOR_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            tts_url: std::env::var("ML_TTS_URL")
                .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            power_url: std::env::var("ML_POWER_URL")
                .unwrap_or_else(|_| "http://localhost:8003".to_string()),
            tts_language: std::env::var("TTS_LANGUAGE").unwrap_or_else(|_| "hi".to_string()),
            audio_cache_dir: std::env::var("AUDIO_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("audio_cache")),
            timeout: Duration::from_secs(
                std::env::var("ML_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// All ML service clients behind one handle
#[derive(Clone)]
pub struct MLClient {
    pub annotator: AnnotatorClient,
    pub speech: SpeechClient,
    pub power: PowerModelClient,
}

impl MLClient {
    pub fn new(config: MLConfig) -> Self {
        Self {
            annotator: AnnotatorClient::new(config.annotator_url.clone(), config.timeout),
            speech: SpeechClient::new(
                config.tts_url.clone(),
                config.tts_language.clone(),
                config.audio_cache_dir.clone(),
                config.timeout,
            ),
            power: PowerModelClient::new(config.power_url.clone(), config.timeout),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MLConfig::default())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;

    /// Serve `app` on an ephemeral local port and return its base URL.
    pub async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}
