use crate::error::{Result, ResumeScorerError};
use crate::input::FileType;
use crate::llm::ExtractionService;
use crate::output::{EvaluationRecord, EvaluationReport};
use crate::server::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::info;
use serde_json::json;
use std::path::Path;

/// Multipart field carrying the resume file
pub const RESUME_FIELD: &str = "resume";

struct Upload {
    file_name: String,
    declared: String,
    bytes: Vec<u8>,
}

/// POST /api/process-resume
///
/// Extract, score, run the structured extraction once, record the row and
/// return the combined report.
pub async fn process_resume<S>(
    State(state): State<AppState<S>>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationReport>>
where
    S: ExtractionService + Send + Sync + 'static,
{
    let upload = read_resume_field(&mut multipart).await?;
    info!(
        "Received '{}' ({} bytes, {})",
        upload.file_name,
        upload.bytes.len(),
        upload.declared
    );

    let text = state.input.extract_bytes(upload.bytes, &upload.declared).await?;
    let score = state.engine.evaluate(&text);
    let extraction = state.service.extract(&text).await?;
    state.append_record(&EvaluationRecord::from_extraction(&extraction))?;

    Ok(Json(
        EvaluationReport::new(upload.file_name, score).with_extraction(extraction),
    ))
}

pub async fn method_not_allowed() -> Response {
    let body = json!({
        "error": {
            "code": "METHOD_NOT_ALLOWED",
            "message": "Only POST requests are allowed."
        }
    });
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn read_resume_field(multipart: &mut Multipart) -> Result<Upload> {
    let malformed = |e: axum::extract::multipart::MultipartError| {
        ResumeScorerError::InvalidInput(format!("Malformed multipart body: {}", e))
    };

    let Some(field) = multipart.next_field().await.map_err(malformed)? else {
        return Err(ResumeScorerError::InvalidInput(format!(
            "Missing '{}' file field",
            RESUME_FIELD
        )));
    };

    let name = field.name().map(str::to_string);
    if name.as_deref() != Some(RESUME_FIELD) {
        return Err(ResumeScorerError::InvalidInput(format!(
            "Invalid form field name: {}",
            name.as_deref().unwrap_or("<unnamed>")
        )));
    }

    let file_name = field.file_name().unwrap_or("resume").to_string();
    let declared = declared_type(field.content_type(), &file_name);
    let bytes = field.bytes().await.map_err(malformed)?.to_vec();

    Ok(Upload {
        file_name,
        declared,
        bytes,
    })
}

/// Part content type when it names a supported format, else the file extension.
fn declared_type(content_type: Option<&str>, file_name: &str) -> String {
    if let Some(mime) = content_type {
        if FileType::from_mime(mime).is_supported() {
            return mime.to_string();
        }
    }

    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| FileType::from_extension(ext).is_supported())
        .map(str::to_string)
        .or_else(|| content_type.map(str::to_string))
        .unwrap_or_else(|| "application/octet-stream".to_string())
}
