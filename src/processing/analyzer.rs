//! Scoring engine: runs the rule table over a resume and aggregates deductions

use crate::config::{Config, ScoringConfig};
use crate::processing::document::ResumeDocument;
use crate::processing::rules::{Rule, RuleContext, RuleOutcome, RULES};
use crate::processing::spelling::Dictionary;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const MAX_SCORE: u8 = 100;

const EMPTY_INPUT_SUGGESTION: &str = "Upload a resume with readable text.";

/// Engine that applies every enabled rule to a resume
pub struct ScoringEngine {
    penalties: ScoringConfig,
    rules: Vec<Rule>,
    dictionary: Option<Arc<dyn Dictionary>>,
}

/// Final score with the suggestions and diagnostics behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// 100 minus total deductions, rounded and clamped to 0..=100
    pub final_score: u8,
    pub suggestions: Vec<String>,
    pub debug_log: Vec<String>,
    /// Every rule applied, triggered or not, in table order
    pub outcomes: Vec<RuleOutcome>,
}

impl ScoreReport {
    fn empty_input() -> Self {
        Self {
            final_score: 0,
            suggestions: vec![EMPTY_INPUT_SUGGESTION.to_string()],
            debug_log: vec!["Input text is empty".to_string()],
            outcomes: Vec::new(),
        }
    }

    pub fn total_penalty(&self) -> f64 {
        self.triggered().map(|outcome| outcome.penalty).sum()
    }

    pub fn triggered(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.triggered)
    }
}

impl ScoringEngine {
    /// Create an engine with the given penalties; disabled rules are skipped.
    pub fn new(penalties: ScoringConfig) -> Self {
        let rules = RULES
            .iter()
            .filter(|rule| penalties.is_rule_enabled(rule.id))
            .copied()
            .collect();

        Self {
            penalties,
            rules,
            dictionary: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.scoring.clone())
    }

    /// Use a real dictionary for the spelling rule instead of the fallback list
    pub fn with_dictionary(mut self, dictionary: Arc<dyn Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn has_dictionary(&self) -> bool {
        self.dictionary.is_some()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn evaluate(&self, text: &str) -> ScoreReport {
        self.evaluate_document(&ResumeDocument::new(text))
    }

    pub fn evaluate_document(&self, document: &ResumeDocument) -> ScoreReport {
        if document.is_empty() {
            debug!("Empty resume text, skipping rules");
            return ScoreReport::empty_input();
        }

        let ctx = RuleContext {
            document,
            penalties: &self.penalties,
            dictionary: self.dictionary.as_deref(),
        };

        let outcomes: Vec<RuleOutcome> = self.rules.iter().map(|rule| rule.evaluate(&ctx)).collect();

        let mut suggestions = Vec::new();
        let mut debug_log = Vec::new();
        let mut total_penalty = 0.0;

        for outcome in outcomes.iter().filter(|outcome| outcome.triggered) {
            debug!("Rule {} deducted {:.1}", outcome.rule, outcome.penalty);
            total_penalty += outcome.penalty;
            suggestions.push(outcome.message.clone());
            debug_log.push(match &outcome.debug_info {
                Some(info) => format!("{} (-{:.1}): {}", outcome.rule, outcome.penalty, info),
                None => format!("{} (-{:.1})", outcome.rule, outcome.penalty),
            });
        }

        let final_score = Self::clamp_score(f64::from(MAX_SCORE) - total_penalty);
        info!(
            "Resume scored {}/{} with {} deduction(s)",
            final_score,
            MAX_SCORE,
            suggestions.len()
        );

        ScoreReport {
            final_score,
            suggestions,
            debug_log,
            outcomes,
        }
    }

    fn clamp_score(raw: f64) -> u8 {
        if raw.is_nan() {
            return 0;
        }
        raw.round().clamp(0.0, f64::from(MAX_SCORE)) as u8
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Score a resume with the default penalties and the fallback typo list.
pub fn evaluate(text: &str) -> ScoreReport {
    ScoringEngine::default().evaluate(text)
}
