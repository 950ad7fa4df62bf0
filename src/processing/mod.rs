//! Text processing and rule-based scoring module

pub mod text_processor;
pub mod document;
pub mod experience;
pub mod spelling;
pub mod rules;
pub mod analyzer;

pub use analyzer::{evaluate, ScoreReport, ScoringEngine};
