use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::audio::DEFAULT_SUMMARY_CHARS;
use crate::builder::DEFAULT_MAX_COMPARISONS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// NewsAPI credential; requests may also supply their own
    pub news_api_key: Option<String>,
    pub news_api_url: String,
    pub page_size: u32,

    pub max_comparisons: usize,

    // Audio summary
    pub audio_cache_dir: PathBuf,
    pub summary_chars: usize,
}

impl AnalysisConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            news_api_key: env::var("NEWSAPI_KEY").ok().filter(|k| !k.trim().is_empty()),
            news_api_url: env::var("NEWSAPI_URL")
                .unwrap_or_else(|_| "https://newsapi.org".to_string()),
            page_size: env::var("NEWS_PAGE_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("NEWS_PAGE_SIZE must be a positive integer")?,
            max_comparisons: env::var("MAX_COMPARISONS")
                .unwrap_or_else(|_| DEFAULT_MAX_COMPARISONS.to_string())
                .parse()
                .context("MAX_COMPARISONS must be a non-negative integer")?,
            audio_cache_dir: env::var("AUDIO_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("audio_cache")),
            summary_chars: env::var("AUDIO_SUMMARY_CHARS")
                .unwrap_or_else(|_| DEFAULT_SUMMARY_CHARS.to_string())
                .parse()
                .context("AUDIO_SUMMARY_CHARS must be a positive integer")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > 100 {
            anyhow::bail!("NEWS_PAGE_SIZE must be between 1 and 100, got {}", self.page_size);
        }
        if self.summary_chars == 0 {
            anyhow::bail!("AUDIO_SUMMARY_CHARS must be greater than zero");
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            news_api_key: None,
            news_api_url: "https://newsapi.org".to_string(),
            page_size: 10,
            max_comparisons: DEFAULT_MAX_COMPARISONS,
            audio_cache_dir: PathBuf::from("audio_cache"),
            summary_chars: DEFAULT_SUMMARY_CHARS,
        }
    }
}
