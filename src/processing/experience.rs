//! Work Experience entry parsing: bullets, headers, action verbs and metrics

use crate::processing::text_processor::non_empty_lines;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static LINE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[•\-*–]\s+(.*)$").expect("Invalid bullet regex"));

// Spaced hyphen/dash between two non-empty sides, or an unspaced en/em dash.
static ROLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S\s+[-–—]\s+\S|\S[–—]\S").expect("Invalid separator regex"));

// Parenthesised spans and date ranges, removed before looking for the role separator.
static DATED_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\([^)]*\)|(?:\b[a-z]{3,9}\.?\s+)?\b(?:19|20)\d{2}\s*[-–—]\s*(?:(?:[a-z]{3,9}\.?\s+)?(?:19|20)\d{2}\b|present\b|current\b|now\b|date\b)",
    )
    .expect("Invalid date range regex")
});

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:19|20)\d{2}\b|\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b",
    )
    .expect("Invalid date regex")
});

static METRIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[$₹€£]?\d+(?:[.,]\d+)*\s*(?:%|cr\b|crores?\b|k\b|m\b|mn\b|million\b|lakhs?\b)?|\b(?:percent|per\s+cent|growth|doubled|tripled)\b",
    )
    .expect("Invalid metric regex")
});

static ACTION_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "accelerated", "achieved", "administered", "analysed", "analyzed", "architected", "audited",
        "authored", "automated", "boosted", "built", "championed", "coached", "collaborated",
        "conducted", "consolidated", "coordinated", "created", "cut", "delivered", "deployed",
        "designed", "developed", "directed", "doubled", "drove", "engineered", "established",
        "evaluated", "exceeded", "executed", "expanded", "facilitated", "founded", "generated",
        "grew", "guided", "handled", "headed", "implemented", "improved", "increased", "initiated",
        "introduced", "launched", "led", "maintained", "managed", "mentored", "migrated",
        "modernised", "negotiated", "optimised", "optimized", "orchestrated", "organised",
        "organized", "oversaw", "pioneered", "planned", "presented", "produced", "raised",
        "redesigned", "reduced", "resolved", "restructured", "revamped", "saved", "scaled",
        "secured", "shipped", "simplified", "spearheaded", "streamlined", "strengthened",
        "supervised", "supported", "trained", "transformed", "tripled", "won",
    ]
    .into_iter()
    .collect()
});

/// One job inside the Work Experience section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub header: Option<String>,
    pub bullets: Vec<String>,
}

/// Per-entry findings for the Work Experience rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceAssessment {
    pub entries: Vec<WorkEntry>,
    pub defects: Vec<String>,
    pub has_any_metric: bool,
}

/// Bullet texts on one line.
///
/// Lines opening with a glyph give one bullet, cut at any inline `•`; inline
/// `•` glyphs left by PDF flattening give one bullet per segment. Both passes
/// run and duplicates are dropped by exact text.
fn line_bullets(line: &str) -> (Option<String>, Vec<String>) {
    let mut bullets: Vec<String> = Vec::new();
    let mut push = |text: &str| {
        let text = text.trim();
        if !text.is_empty() && !bullets.iter().any(|existing| existing == text) {
            bullets.push(text.to_string());
        }
    };

    let glyph_body = LINE_BULLET
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    if let Some(body) = glyph_body {
        push(body.split('•').next().unwrap_or(body));
    }

    let mut segments = line.split('•');
    let lead = segments.next().unwrap_or_default().trim();
    for segment in segments {
        push(segment);
    }

    let header = if glyph_body.is_none() && !lead.is_empty() {
        Some(lead.to_string())
    } else {
        None
    };

    (header, bullets)
}

/// Split a Work Experience body into entries.
pub fn parse_entries(section: &str) -> Vec<WorkEntry> {
    let mut entries: Vec<WorkEntry> = Vec::new();

    for line in non_empty_lines(section) {
        let (header, bullets) = line_bullets(line);

        if let Some(header) = header {
            let continues_bullet = bullets.is_empty()
                && header.chars().next().is_some_and(char::is_lowercase)
                && !looks_like_header(&header)
                && entries.last().is_some_and(|entry| !entry.bullets.is_empty());

            if continues_bullet {
                if let Some(last) = entries.last_mut().and_then(|entry| entry.bullets.last_mut()) {
                    last.push(' ');
                    last.push_str(&header);
                }
                continue;
            }

            entries.push(WorkEntry {
                header: Some(header),
                bullets: Vec::new(),
            });
        } else if entries.is_empty() {
            entries.push(WorkEntry::default());
        }

        if let Some(entry) = entries.last_mut() {
            for bullet in bullets {
                if !entry.bullets.contains(&bullet) {
                    entry.bullets.push(bullet);
                }
            }
        }
    }

    entries
}

fn looks_like_header(line: &str) -> bool {
    ROLE_SEPARATOR.is_match(line) || DATE_TOKEN.is_match(line)
}

/// `role - company` separator and a date token, both required.
///
/// The separator must sit outside the dates, so `Manager (2019 - Present)`
/// has no company.
pub fn header_is_well_formed(header: &str) -> bool {
    let undated = DATED_SPAN.replace_all(header, " ");
    ROLE_SEPARATOR.is_match(&undated) && DATE_TOKEN.is_match(header)
}

pub fn starts_with_action_verb(bullet: &str) -> bool {
    bullet
        .split_whitespace()
        .next()
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase()
        })
        .is_some_and(|word| ACTION_VERBS.contains(word.as_str()))
}

pub fn contains_metric(bullet: &str) -> bool {
    METRIC.is_match(bullet)
}

/// Bullets needed to open with an action verb: `ceil(ratio * count)`.
pub fn required_action_verbs(bullet_count: usize, ratio: f64) -> usize {
    (ratio * bullet_count as f64 - 1e-9).ceil().max(0.0) as usize
}

pub fn assess(section: &str, action_verb_ratio: f64) -> ExperienceAssessment {
    let entries = parse_entries(section);
    let mut defects = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let label = entry
            .header
            .clone()
            .unwrap_or_else(|| format!("entry {}", index + 1));

        if let Some(header) = &entry.header {
            if !header_is_well_formed(header) {
                defects.push(format!(
                    "Format the header '{}' as 'Role - Company' with dates.",
                    header
                ));
            }
        }

        let with_verbs = entry
            .bullets
            .iter()
            .filter(|bullet| starts_with_action_verb(bullet))
            .count();
        let required = required_action_verbs(entry.bullets.len(), action_verb_ratio);
        if with_verbs < required {
            defects.push(format!(
                "Start more bullets with action verbs in '{}' ({} of {}).",
                label,
                with_verbs,
                entry.bullets.len()
            ));
        }

        if entry.bullets.is_empty() {
            defects.push(format!("Add bullet points with measurable results under '{}'.", label));
        } else if !entry.bullets.iter().any(|bullet| contains_metric(bullet)) {
            defects.push(format!("Quantify at least one bullet in '{}'.", label));
        }
    }

    let has_any_metric = entries
        .iter()
        .flat_map(|entry| entry.bullets.iter())
        .any(|bullet| contains_metric(bullet));

    ExperienceAssessment {
        entries,
        defects,
        has_any_metric,
    }
}
