//! Upload endpoint driven in-process through the router

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use resume_scorer::error::Result;
use resume_scorer::input::InputManager;
use resume_scorer::llm::{parse_extraction, ExtractionService, StructuredExtraction};
use resume_scorer::output::CsvRecordSink;
use resume_scorer::server::{build_router, AppState};
use resume_scorer::ScoringEngine;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "resume-scorer-test-boundary";

const EXTRACTION_JSON: &str = r#"{"personalData":{"name":"Priya Sharma","email":"priya.sharma@example.com","phone":"98765 43210","latestJobRole":"Senior Sales Manager"},
    "scores":{"formatting":88,"content":81,"contact":95},
    "comments":{"formatting":"Simple layout","content":"Strong metrics","contact":"Clear order"}}"#;

struct CountingExtraction {
    reply: &'static str,
    calls: AtomicUsize,
}

impl CountingExtraction {
    fn new(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ExtractionService for CountingExtraction {
    async fn extract(&self, _resume_text: &str) -> Result<StructuredExtraction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        parse_extraction(self.reply)
    }
}

fn router(service: Arc<CountingExtraction>, csv_path: &Path) -> Router {
    let state = AppState::new(ScoringEngine::new(Default::default()), InputManager::new(), service)
        .with_record_sink(Arc::new(CsvRecordSink::new(csv_path)));
    build_router(state)
}

fn upload(field: &str, file_name: &str, content_type: &str, content: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/process-resume")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024).await.expect("body");
    serde_json::from_slice(&body).expect("json")
}

fn fixture() -> Vec<u8> {
    std::fs::read("tests/fixtures/sample_resume.txt").expect("fixture")
}

fn csv_path(dir: &TempDir) -> PathBuf {
    dir.path().join("evaluations.csv")
}

#[tokio::test]
async fn test_upload_returns_score_and_extraction_and_records_row() {
    let dir = TempDir::new().unwrap();
    let service = CountingExtraction::new(EXTRACTION_JSON);

    let response = router(service.clone(), &csv_path(&dir))
        .oneshot(upload("resume", "priya.txt", "text/plain", &fixture()))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = json_body(response).await;
    assert_eq!(payload["source"], "priya.txt");
    assert_eq!(payload["score"]["final_score"], 100);
    assert_eq!(payload["band"], "strong");
    assert_eq!(payload["extraction"]["personalData"]["name"], "Priya Sharma");
    assert_eq!(service.calls(), 1);

    let rows = std::fs::read_to_string(csv_path(&dir)).unwrap();
    assert_eq!(rows.lines().count(), 2);
    assert!(rows.lines().nth(1).unwrap().starts_with("Priya Sharma,"));
}

#[tokio::test]
async fn test_upload_type_falls_back_to_file_extension() {
    let dir = TempDir::new().unwrap();
    let service = CountingExtraction::new(EXTRACTION_JSON);

    let response = router(service, &csv_path(&dir))
        .oneshot(upload("resume", "priya.txt", "application/octet-stream", &fixture()))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_non_post_is_rejected() {
    let dir = TempDir::new().unwrap();
    let service = CountingExtraction::new(EXTRACTION_JSON);

    let response = router(service.clone(), &csv_path(&dir))
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/process-resume")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let payload = json_body(response).await;
    assert_eq!(payload["error"]["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_unsupported_upload_never_reaches_extraction() {
    let dir = TempDir::new().unwrap();
    let service = CountingExtraction::new(EXTRACTION_JSON);

    let response = router(service.clone(), &csv_path(&dir))
        .oneshot(upload("resume", "photo.png", "image/png", b"\x89PNG\r\n"))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let payload = json_body(response).await;
    assert_eq!(payload["error"]["code"], "UNSUPPORTED_FORMAT");
    assert_eq!(service.calls(), 0);
    assert!(!csv_path(&dir).exists());
}

#[tokio::test]
async fn test_unreadable_document_is_an_extraction_failure() {
    let dir = TempDir::new().unwrap();
    let service = CountingExtraction::new(EXTRACTION_JSON);

    let response = router(service.clone(), &csv_path(&dir))
        .oneshot(upload("resume", "cv.pdf", "application/pdf", b"%PDF-1.4 garbage"))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"]["code"], "EXTRACTION_FAILED");
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_malformed_extraction_is_reported_once_and_not_recorded() {
    let dir = TempDir::new().unwrap();
    let service = CountingExtraction::new("Sure! Here is the JSON you asked for.");

    let response = router(service.clone(), &csv_path(&dir))
        .oneshot(upload("resume", "priya.txt", "text/plain", &fixture()))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = json_body(response).await;
    assert_eq!(payload["error"]["code"], "MALFORMED_AI_RESPONSE");
    assert_eq!(payload["rawOutput"], "Sure! Here is the JSON you asked for.");
    assert_eq!(service.calls(), 1);
    assert!(!csv_path(&dir).exists());
}

#[tokio::test]
async fn test_wrong_field_name_is_a_validation_error() {
    let dir = TempDir::new().unwrap();
    let service = CountingExtraction::new(EXTRACTION_JSON);

    let response = router(service.clone(), &csv_path(&dir))
        .oneshot(upload("cv", "priya.txt", "text/plain", &fixture()))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(service.calls(), 0);
}
