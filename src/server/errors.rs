use crate::error::ResumeScorerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;

impl ResumeScorerError {
    /// HTTP status and stable error code for the upload endpoint.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ResumeScorerError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ResumeScorerError::UnsupportedFormat(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
            }
            ResumeScorerError::ExtractionFailed(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
            }
            ResumeScorerError::ExtractionTimeout(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_TIMEOUT")
            }
            ResumeScorerError::MalformedAiResponse { .. } => {
                (StatusCode::BAD_GATEWAY, "MALFORMED_AI_RESPONSE")
            }
            ResumeScorerError::AiApi { .. } | ResumeScorerError::AiRequest(_) => {
                (StatusCode::BAD_GATEWAY, "AI_ERROR")
            }
            ResumeScorerError::RecordSink(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RECORD_ERROR"),
            ResumeScorerError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            ResumeScorerError::Io(_)
            | ResumeScorerError::Serialization(_)
            | ResumeScorerError::OutputFormatting(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ResumeScorerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            error!("Request failed: {}", self);
            "An internal server error occurred".to_string()
        } else {
            self.to_string()
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message
            }
        });

        if let ResumeScorerError::MalformedAiResponse { raw } = &self {
            error!("Unparseable extraction response ({} chars)", raw.len());
            body["rawOutput"] = json!(raw);
        }

        (status, Json(body)).into_response()
    }
}
