//! Error handling for the resume scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Text extraction timed out after {0}s")]
    ExtractionTimeout(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("AI request failed: {0}")]
    AiRequest(#[from] reqwest::Error),

    #[error("AI service error (status {status}): {message}")]
    AiApi { status: u16, message: String },

    #[error("AI response is not the expected JSON object")]
    MalformedAiResponse { raw: String },

    #[error("Record store error: {0}")]
    RecordSink(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeScorerError>;

impl From<csv::Error> for ResumeScorerError {
    fn from(err: csv::Error) -> Self {
        ResumeScorerError::RecordSink(err.to_string())
    }
}

impl ResumeScorerError {
    /// Errors the user can fix by supplying a different file or text.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ResumeScorerError::UnsupportedFormat(_)
                | ResumeScorerError::ExtractionFailed(_)
                | ResumeScorerError::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_classified() {
        assert!(ResumeScorerError::UnsupportedFormat("xyz".into()).is_input_error());
        assert!(ResumeScorerError::ExtractionFailed("empty".into()).is_input_error());
        assert!(!ResumeScorerError::RecordSink("disk full".into()).is_input_error());
        assert!(!ResumeScorerError::MalformedAiResponse { raw: "oops".into() }.is_input_error());
    }

    #[test]
    fn test_csv_error_converts_to_record_sink() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: ResumeScorerError = csv::Error::from(io).into();
        assert!(matches!(err, ResumeScorerError::RecordSink(_)));
    }
}
