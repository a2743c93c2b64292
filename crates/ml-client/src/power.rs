use async_trait::async_trait;
use power_forecast::{FeatureVector, ForecastResult, PowerModel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{check_status, MLResult};

#[derive(Debug, Clone, Serialize)]
struct PredictRequest {
    features: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: f64,
}

/// Remote power model served over HTTP.
#[derive(Clone)]
pub struct PowerModelClient {
    client: reqwest::Client,
    base_url: String,
}

impl PowerModelClient {
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

    pub async fn predict_features(&self, features: &FeatureVector) -> MLResult<f64> {
        let request = PredictRequest {
            features: features.to_map(),
        };

        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&request)
            .send()
            .await?;

        let result = check_status(response).await?.json::<PredictResponse>().await?;
        Ok(result.prediction)
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
impl PowerModel for PowerModelClient {
    async fn predict(&self, features: &FeatureVector) -> ForecastResult<f64> {
        Ok(self.predict_features(features).await?)
    }

    fn name(&self) -> &str {
        "power-service"
    }
}
