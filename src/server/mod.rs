//! HTTP upload endpoint: the same score and extraction flow as `analyze`,
//! driven by a multipart upload

pub mod errors;
pub mod handlers;

use crate::error::{Result, ResumeScorerError};
use crate::input::InputManager;
use crate::llm::ExtractionService;
use crate::output::{EvaluationRecord, RecordSink};
use crate::processing::ScoringEngine;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use log::info;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Shared per-request state; cloning only bumps reference counts.
pub struct AppState<S> {
    pub engine: Arc<ScoringEngine>,
    pub input: Arc<InputManager>,
    pub service: Arc<S>,
    sink: Option<Arc<dyn RecordSink>>,
    // appends from concurrent requests must not interleave
    record_lock: Arc<Mutex<()>>,
    max_upload_bytes: usize,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            input: Arc::clone(&self.input),
            service: Arc::clone(&self.service),
            sink: self.sink.clone(),
            record_lock: Arc::clone(&self.record_lock),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

impl<S> AppState<S> {
    pub fn new(engine: ScoringEngine, input: InputManager, service: Arc<S>) -> Self {
        Self {
            engine: Arc::new(engine),
            input: Arc::new(input),
            service,
            sink: None,
            record_lock: Arc::new(Mutex::new(())),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }

    pub fn with_record_sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    fn append_record(&self, record: &EvaluationRecord) -> Result<()> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };

        let _guard = self
            .record_lock
            .lock()
            .map_err(|_| ResumeScorerError::RecordSink("Record lock poisoned".to_string()))?;
        sink.append(record)
    }
}

pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: ExtractionService + Send + Sync + 'static,
{
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/process-resume",
            post(handlers::process_resume::<S>).fallback(handlers::method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve<S>(addr: SocketAddr, state: AppState<S>) -> Result<()>
where
    S: ExtractionService + Send + Sync + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
