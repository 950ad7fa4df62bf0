//! Structured extraction service integration

pub mod prompts;
pub mod client;
pub mod analyzer;

pub use analyzer::{parse_extraction, StructuredExtraction};
pub use client::{ExtractionService, GeminiClient};
