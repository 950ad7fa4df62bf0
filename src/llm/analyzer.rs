//! Structured extraction result and its parsing

use crate::error::{Result, ResumeScorerError};
use serde::{Deserialize, Serialize};

/// Candidate details and category ratings returned by the extraction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredExtraction {
    pub personal_data: PersonalData,
    pub scores: CategoryScores,
    pub comments: CategoryComments,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub latest_job_role: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub formatting: f64,
    pub content: f64,
    pub contact: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryComments {
    pub formatting: String,
    pub content: String,
    pub contact: String,
}

/// Parse the model's reply. Anything other than the exact JSON shape is
/// rejected with the raw text attached.
pub fn parse_extraction(raw: &str) -> Result<StructuredExtraction> {
    serde_json::from_str(raw.trim()).map_err(|e| {
        log::warn!("Extraction response did not parse: {}", e);
        ResumeScorerError::MalformedAiResponse {
            raw: raw.to_string(),
        }
    })
}
