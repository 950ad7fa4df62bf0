//! Text normalization and tokenization

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

static LINE_ENDINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").expect("Invalid line ending regex"));

// Any run of whitespace that is not a newline: spaces, tabs, NBSP, thin spaces.
static HORIZONTAL_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\S\n]+").expect("Invalid horizontal whitespace regex"));

static LINE_EDGE_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" ?\n ?").expect("Invalid line edge regex"));

static HYPHEN_WRAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)-\s+").expect("Invalid hyphen wrap regex"));

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid newline regex"));

static WORD_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}']+").expect("Invalid word token regex"));

/// Normalize extracted resume text into its display form.
///
/// Horizontal whitespace collapses to single spaces, line edges are trimmed,
/// hyphenated line-wraps are joined, and blank-line runs are capped at one
/// blank line. Total over any input and idempotent.
pub fn normalize(raw: &str) -> String {
    let text = LINE_ENDINGS.replace_all(raw, "\n");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = LINE_EDGE_SPACE.replace_all(&text, "\n");
    let text = HYPHEN_WRAP.replace_all(&text, "${1}-");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Trimmed, non-empty lines in document order.
pub fn non_empty_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Split text into sentences
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .collect()
}

/// Runs of letters and apostrophes longer than two characters.
///
/// Apostrophes at either end are dropped so quoted words tokenize cleanly.
pub fn word_tokens(text: &str) -> Vec<&str> {
    WORD_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().trim_matches('\''))
        .filter(|token| token.chars().count() > 2)
        .collect()
}
