use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model returned an unusable prediction: {0}")]
    InvalidPrediction(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ForecastResult<T> = Result<T, ForecastError>;
