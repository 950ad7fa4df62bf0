//! Resume scorer library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod llm;
pub mod output;
pub mod server;

pub use config::Config;
pub use error::{Result, ResumeScorerError};
pub use input::extract_bytes;
pub use processing::{evaluate, ScoreReport, ScoringEngine};
