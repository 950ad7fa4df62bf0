//! Report structure shared by every output format

use crate::llm::analyzer::StructuredExtraction;
use crate::processing::analyzer::ScoreReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=u8::MAX => ScoreBand::Strong,
            60..=84 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "STRONG",
            ScoreBand::Fair => "FAIR",
            ScoreBand::Weak => "WEAK",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "Likely to parse cleanly in most applicant tracking systems.",
            ScoreBand::Fair => "Readable by most ATS, but the suggestions below will lift it.",
            ScoreBand::Weak => "At risk of being misread or filtered out by ATS.",
        }
    }
}

/// Everything rendered for one evaluated resume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// File path, or `<text>`/`<stdin>` for inline input
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub band: ScoreBand,
    pub score: ScoreReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<StructuredExtraction>,
}

impl EvaluationReport {
    pub fn new(source: impl Into<String>, score: ScoreReport) -> Self {
        Self {
            source: source.into(),
            generated_at: Utc::now(),
            band: ScoreBand::from_score(score.final_score),
            score,
            extraction: None,
        }
    }

    pub fn with_extraction(mut self, extraction: StructuredExtraction) -> Self {
        self.extraction = Some(extraction);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::analyzer::evaluate;

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(85), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(84), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(60), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(59), ScoreBand::Weak);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Weak);
    }

    #[test]
    fn test_report_band_follows_score() {
        let report = EvaluationReport::new("<text>", evaluate(""));
        assert_eq!(report.band, ScoreBand::Weak);
        assert!(report.extraction.is_none());
    }
}
