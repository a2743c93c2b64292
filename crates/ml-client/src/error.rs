use power_forecast::ForecastError;
use report_core::AnalysisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MLError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type MLResult<T> = Result<T, MLError>;

impl From<MLError> for AnalysisError {
    fn from(err: MLError) -> Self {
        match err {
            MLError::InvalidResponse(msg) => AnalysisError::InvalidData(msg),
            other => AnalysisError::ApiError(other.to_string()),
        }
    }
}

impl From<MLError> for ForecastError {
    fn from(err: MLError) -> Self {
        ForecastError::ModelUnavailable(err.to_string())
    }
}

/// Non-2xx replies become `ServiceUnavailable` carrying the status and a
/// short prefix of the body.
pub(crate) async fn check_status(response: reqwest::Response) -> MLResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail: String = body.chars().take(200).collect();
    Err(MLError::ServiceUnavailable(format!("Status: {} {}", status, detail).trim_end().to_string()))
}
