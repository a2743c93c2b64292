use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InputValidation(String),

    #[error("No news found for {0}")]
    EmptyResult(String),

    #[error("Cannot build a report from zero articles")]
    EmptyInput,

    #[error("Audio synthesis failed: {0}")]
    Synthesis(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown error: {0}")]
    Unclassified(String),
}

impl AnalysisError {
    /// Message shown to the person who submitted the request.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::InputValidation(msg) => msg.clone(),
            AnalysisError::EmptyResult(_) => "No news found. Try a different company.".to_string(),
            AnalysisError::Synthesis(msg) => format!(
                "Failed to generate audio summary: {}. Please check your internet connection and try again.",
                msg
            ),
            other => format!("Analysis failed: {}", other),
        }
    }

    /// Only audio failures leave a usable report behind.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalysisError::Synthesis(_))
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = AnalysisError::InputValidation("Please enter a company name".to_string());
        assert_eq!(err.user_message(), "Please enter a company name");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_empty_result_message() {
        let err = AnalysisError::EmptyResult("Tesla".to_string());
        assert_eq!(err.user_message(), "No news found. Try a different company.");
    }

    #[test]
    fn test_only_synthesis_is_recoverable() {
        assert!(AnalysisError::Synthesis("tts down".to_string()).is_recoverable());
        assert!(!AnalysisError::ApiError("HTTP 500".to_string()).is_recoverable());
        assert!(!AnalysisError::EmptyInput.is_recoverable());
    }

    #[test]
    fn test_generic_errors_are_prefixed() {
        let err = AnalysisError::ApiError("HTTP 401: apiKeyInvalid".to_string());
        assert_eq!(err.user_message(), "Analysis failed: API error: HTTP 401: apiKeyInvalid");
    }
}
