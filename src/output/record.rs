//! Evaluation records and the append-only stores they go to

use crate::error::{Result, ResumeScorerError};
use crate::llm::analyzer::StructuredExtraction;
use chrono::{SecondsFormat, Utc};
use csv::WriterBuilder;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// One row per evaluated resume. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub latest_job_role: String,
    pub formatting_score: f64,
    pub formatting_comment: String,
    pub content_score: f64,
    pub content_comment: String,
    pub contact_score: f64,
    pub contact_comment: String,
    pub timestamp: String,
}

impl EvaluationRecord {
    pub fn from_extraction(extraction: &StructuredExtraction) -> Self {
        Self::with_timestamp(extraction, Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn with_timestamp(extraction: &StructuredExtraction, timestamp: String) -> Self {
        let person = &extraction.personal_data;
        Self {
            name: person.name.clone(),
            email: person.email.clone(),
            phone: person.phone.clone(),
            latest_job_role: person.latest_job_role.clone(),
            formatting_score: extraction.scores.formatting,
            formatting_comment: extraction.comments.formatting.clone(),
            content_score: extraction.scores.content,
            content_comment: extraction.comments.content.clone(),
            contact_score: extraction.scores.contact,
            contact_comment: extraction.comments.contact.clone(),
            timestamp,
        }
    }
}

pub trait RecordSink: Send + Sync {
    fn append(&self, record: &EvaluationRecord) -> Result<()>;
}

/// Appends records to a CSV file, writing the header row when the file is new.
pub struct CsvRecordSink {
    path: PathBuf,
}

impl CsvRecordSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvRecordSink {
    fn append(&self, record: &EvaluationRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let is_new = std::fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                ResumeScorerError::RecordSink(format!("Cannot open {}: {}", self.path.display(), e))
            })?;

        let mut writer = WriterBuilder::new().has_headers(is_new).from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        info!("Recorded evaluation for '{}' in {}", record.name, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::analyzer::parse_extraction;
    use tempfile::TempDir;

    fn extraction() -> StructuredExtraction {
        parse_extraction(
            r#"{"personalData":{"name":"Jane Doe","email":"jane@example.com","phone":"98765 43210","latestJobRole":"Sales Lead"},
                "scores":{"formatting":80,"content":70,"contact":90},
                "comments":{"formatting":"Clean, simple","content":"Add metrics","contact":"Good"}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_record_column_order() {
        let record = EvaluationRecord::with_timestamp(&extraction(), "2024-01-01T00:00:00.000Z".to_string());
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let line = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            line,
            "Jane Doe,jane@example.com,98765 43210,Sales Lead,80.0,\"Clean, simple\",70.0,Add metrics,90.0,Good,2024-01-01T00:00:00.000Z\n"
        );
    }

    #[test]
    fn test_timestamp_is_utc_rfc3339() {
        let record = EvaluationRecord::from_extraction(&extraction());
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
        assert!(record.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_csv_sink_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("evaluations.csv");
        let sink = CsvRecordSink::new(&path);
        let record = EvaluationRecord::from_extraction(&extraction());

        sink.append(&record).unwrap();
        sink.append(&record).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("name,email,phone,latest_job_role,formatting_score"));
        assert!(lines[1].starts_with("Jane Doe,"));
        assert_eq!(lines[1], lines[2]);
    }
}
