//! ATS-friendliness rule table
//!
//! Each rule is an independent, total check over a [`ResumeDocument`]. Rules
//! never read each other's outcomes, so the score is always 100 minus the
//! itemized deductions of whichever rules triggered.

use crate::config::ScoringConfig;
use crate::processing::document::{ResumeDocument, SectionType};
use crate::processing::experience;
use crate::processing::spelling::{self, Dictionary};
use crate::processing::text_processor::{non_empty_lines, split_sentences};
use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Name,
    Phone,
    Email,
    ProfileLink,
    Location,
    Images,
    Tables,
    SingleColumn,
    UkSpelling,
    AllowedSymbols,
    ParagraphSpacing,
    SectionHeadings,
    ProfessionalSummary,
    WorkExperience,
    Metrics,
    EducationFormat,
    CertificatesFormat,
    Spelling,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Name => "name",
            RuleId::Phone => "phone",
            RuleId::Email => "email",
            RuleId::ProfileLink => "profile_link",
            RuleId::Location => "location",
            RuleId::Images => "images",
            RuleId::Tables => "tables",
            RuleId::SingleColumn => "single_column",
            RuleId::UkSpelling => "uk_spelling",
            RuleId::AllowedSymbols => "allowed_symbols",
            RuleId::ParagraphSpacing => "paragraph_spacing",
            RuleId::SectionHeadings => "section_headings",
            RuleId::ProfessionalSummary => "professional_summary",
            RuleId::WorkExperience => "work_experience",
            RuleId::Metrics => "metrics",
            RuleId::EducationFormat => "education_format",
            RuleId::CertificatesFormat => "certificates_format",
            RuleId::Spelling => "spelling",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: RuleId,
    pub triggered: bool,
    pub penalty: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<String>,
}

impl RuleOutcome {
    pub fn pass(rule: RuleId) -> Self {
        Self {
            rule,
            triggered: false,
            penalty: 0.0,
            message: String::new(),
            debug_info: None,
        }
    }

    pub fn fail(rule: RuleId, penalty: f64, message: impl Into<String>) -> Self {
        Self {
            rule,
            triggered: true,
            penalty,
            message: message.into(),
            debug_info: None,
        }
    }

    pub fn with_debug(mut self, info: impl Into<String>) -> Self {
        self.debug_info = Some(info.into());
        self
    }
}

/// Everything a rule may read.
pub struct RuleContext<'a> {
    pub document: &'a ResumeDocument,
    pub penalties: &'a ScoringConfig,
    pub dictionary: Option<&'a dyn Dictionary>,
}

pub type RuleCheck = fn(&RuleContext<'_>) -> RuleOutcome;

#[derive(Clone, Copy)]
pub struct Rule {
    pub id: RuleId,
    check: RuleCheck,
}

impl Rule {
    pub const fn new(id: RuleId, check: RuleCheck) -> Self {
        Self { id, check }
    }

    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        (self.check)(ctx)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish()
    }
}

/// The canonical rule table, in evaluation and reporting order.
pub const RULES: [Rule; 18] = [
    Rule::new(RuleId::Name, check_name),
    Rule::new(RuleId::Phone, check_phone),
    Rule::new(RuleId::Email, check_email),
    Rule::new(RuleId::ProfileLink, check_profile_link),
    Rule::new(RuleId::Location, check_location),
    Rule::new(RuleId::Images, check_images),
    Rule::new(RuleId::Tables, check_tables),
    Rule::new(RuleId::SingleColumn, check_single_column),
    Rule::new(RuleId::UkSpelling, check_uk_spelling),
    Rule::new(RuleId::AllowedSymbols, check_allowed_symbols),
    Rule::new(RuleId::ParagraphSpacing, check_paragraph_spacing),
    Rule::new(RuleId::SectionHeadings, check_section_headings),
    Rule::new(RuleId::ProfessionalSummary, check_professional_summary),
    Rule::new(RuleId::WorkExperience, check_work_experience),
    Rule::new(RuleId::Metrics, check_metrics),
    Rule::new(RuleId::EducationFormat, check_education_format),
    Rule::new(RuleId::CertificatesFormat, check_certificates_format),
    Rule::new(RuleId::Spelling, check_spelling),
];

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\+\d{1,3}[ .-]?\d[\d .-]{5,14}\d|\b\d{10}\b|\b\d{5}[ -]\d{5}\b|\(?\b\d{3}\)?[ .-]\d{3}[ .-]\d{4}\b",
    )
    .expect("Invalid phone regex")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("Invalid email regex")
});

static PROFILE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bhttps?://\S+|\bwww\.[a-z0-9-]+(?:\.[a-z0-9-]+)+|\b(?:linkedin|github)\.com/\S+")
        .expect("Invalid link regex")
});

static LOCATION: Lazy<Regex> = Lazy::new(|| {
    let cities = [
        "mumbai", "new delhi", "delhi", "bengaluru", "bangalore", "hyderabad", "chennai", "kolkata",
        "pune", "ahmedabad", "jaipur", "lucknow", "chandigarh", "srinagar", "jammu", "noida",
        "gurgaon", "gurugram", "kochi", "indore", "bhopal", "nagpur", "surat", "london",
        "manchester", "birmingham", "edinburgh", "glasgow", "dublin", "dubai", "singapore",
        "new york", "toronto", "sydney",
    ];
    Regex::new(&format!(r"(?i)\b(?:{})\b|\(\s*\d{{6}}\s*\)", cities.join("|"))).expect("Invalid location regex")
});

static IMAGE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<img\b|data:image/|\bhttps?://\S+\.(?:png|jpe?g|gif|bmp|svg|webp)\b")
        .expect("Invalid image regex")
});

static TABLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<table\b|\btable\b").expect("Invalid table regex"));

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("Invalid year regex"));

static SPACED_HYPHEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S\s+[-–]\s+\S").expect("Invalid separator regex"));

static URL_OR_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bhttps?://\S+|\bwww\.\S+|[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}|\b[a-z0-9-]+\.com/\S*")
        .expect("Invalid contact regex")
});

const US_TO_UK: [(&str, &str); 24] = [
    ("color", "colour"),
    ("colors", "colours"),
    ("colored", "coloured"),
    ("organize", "organise"),
    ("organized", "organised"),
    ("organizing", "organising"),
    ("organization", "organisation"),
    ("analyze", "analyse"),
    ("analyzed", "analysed"),
    ("analyzing", "analysing"),
    ("center", "centre"),
    ("centers", "centres"),
    ("defense", "defence"),
    ("license", "licence"),
    ("behavior", "behaviour"),
    ("favorite", "favourite"),
    ("honor", "honour"),
    ("labor", "labour"),
    ("catalog", "catalogue"),
    ("optimize", "optimise"),
    ("optimized", "optimised"),
    ("prioritize", "prioritise"),
    ("realize", "realise"),
    ("utilize", "utilise"),
];

static US_SPELLING_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(US_TO_UK.iter().map(|(us, _)| us))
        .expect("Failed to build US spelling matcher")
});

const ALLOWED_SYMBOLS: &str = " .,|$-()'_@~\n";

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ALLOWED_SYMBOLS.contains(c)
}

fn is_all_uppercase(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}

fn preview(items: &[String], limit: usize) -> String {
    let mut shown = items.iter().take(limit).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > limit {
        shown.push_str(&format!(" (+{} more)", items.len() - limit));
    }
    shown
}

fn check_name(ctx: &RuleContext<'_>) -> RuleOutcome {
    let has_name = ctx.document.lines().into_iter().take(6).any(|line| {
        let words = line.split_whitespace().count();
        (1..=6).contains(&words) && line.chars().count() < 80 && line.chars().any(char::is_alphabetic)
    });

    if has_name {
        RuleOutcome::pass(RuleId::Name)
    } else {
        RuleOutcome::fail(
            RuleId::Name,
            ctx.penalties.name_missing,
            "Put your full name on its own line at the top.",
        )
        .with_debug("No short name-like line in the first 6 lines")
    }
}

fn check_phone(ctx: &RuleContext<'_>) -> RuleOutcome {
    if PHONE.is_match(ctx.document.text()) {
        RuleOutcome::pass(RuleId::Phone)
    } else {
        RuleOutcome::fail(RuleId::Phone, ctx.penalties.phone_missing, "Add a phone number.")
            .with_debug("No phone number found")
    }
}

fn check_email(ctx: &RuleContext<'_>) -> RuleOutcome {
    if EMAIL.is_match(ctx.document.text()) {
        RuleOutcome::pass(RuleId::Email)
    } else {
        RuleOutcome::fail(RuleId::Email, ctx.penalties.email_missing, "Add an email address.")
            .with_debug("No email address found")
    }
}

fn check_profile_link(ctx: &RuleContext<'_>) -> RuleOutcome {
    if PROFILE_LINK.is_match(ctx.document.text()) {
        RuleOutcome::pass(RuleId::ProfileLink)
    } else {
        RuleOutcome::fail(
            RuleId::ProfileLink,
            ctx.penalties.link_missing,
            "Add a LinkedIn or portfolio link.",
        )
        .with_debug("No URL or profile link found")
    }
}

fn check_location(ctx: &RuleContext<'_>) -> RuleOutcome {
    if LOCATION.is_match(ctx.document.text()) {
        RuleOutcome::pass(RuleId::Location)
    } else {
        RuleOutcome::fail(
            RuleId::Location,
            ctx.penalties.location_missing,
            "Add your city (and postal code) to the contact line.",
        )
        .with_debug("No known city or postal code found")
    }
}

fn check_images(ctx: &RuleContext<'_>) -> RuleOutcome {
    match IMAGE_MARKER.find(ctx.document.raw()) {
        Some(found) => RuleOutcome::fail(
            RuleId::Images,
            ctx.penalties.images,
            "Remove images; ATS parsers cannot read them.",
        )
        .with_debug(format!("Image marker '{}' found", found.as_str())),
        None => RuleOutcome::pass(RuleId::Images),
    }
}

fn check_tables(ctx: &RuleContext<'_>) -> RuleOutcome {
    match TABLE_MARKER.find(ctx.document.raw()) {
        Some(found) => RuleOutcome::fail(
            RuleId::Tables,
            ctx.penalties.tables,
            "Replace tables with plain text lines.",
        )
        .with_debug(format!("Table marker '{}' found", found.as_str())),
        None => RuleOutcome::pass(RuleId::Tables),
    }
}

fn check_single_column(ctx: &RuleContext<'_>) -> RuleOutcome {
    let raw = ctx.document.raw();
    let has_tabs = raw.contains('\t');
    let spaced_lines = raw.lines().filter(|line| line.contains("    ")).count();

    if has_tabs || spaced_lines > ctx.penalties.multi_column_line_limit {
        RuleOutcome::fail(
            RuleId::SingleColumn,
            ctx.penalties.multi_column,
            "Tabs or column spacing detected; convert to a single-column layout.",
        )
        .with_debug(format!(
            "tabs: {}, lines with 4+ spaces: {}",
            has_tabs, spaced_lines
        ))
    } else {
        RuleOutcome::pass(RuleId::SingleColumn)
    }
}

fn check_uk_spelling(ctx: &RuleContext<'_>) -> RuleOutcome {
    let text = ctx.document.text();
    let mut found: Vec<String> = Vec::new();

    for mat in US_SPELLING_MATCHER.find_iter(text) {
        let before = text[..mat.start()].chars().next_back();
        let after = text[mat.end()..].chars().next();
        if before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric) {
            continue;
        }

        let (us, uk) = US_TO_UK[mat.pattern().as_usize()];
        let entry = format!("{} → {}", us, uk);
        if !found.contains(&entry) {
            found.push(entry);
        }
    }

    if found.is_empty() {
        RuleOutcome::pass(RuleId::UkSpelling)
    } else {
        RuleOutcome::fail(
            RuleId::UkSpelling,
            ctx.penalties.us_spelling,
            format!("Use UK English spelling: {}.", preview(&found, 8)),
        )
        .with_debug(format!("{} US spelling(s) detected", found.len()))
    }
}

fn check_allowed_symbols(ctx: &RuleContext<'_>) -> RuleOutcome {
    let offending: Vec<char> = ctx
        .document
        .text()
        .chars()
        .filter(|c| !is_allowed_char(*c))
        .collect();

    if offending.is_empty() {
        return RuleOutcome::pass(RuleId::AllowedSymbols);
    }

    let cap = ctx.penalties.symbol_cap;
    let penalty = if ctx.penalties.symbol_divisor > 0.0 {
        (offending.len() as f64 / ctx.penalties.symbol_divisor).min(cap)
    } else {
        cap
    };
    let distinct: BTreeSet<char> = offending.iter().copied().collect();

    RuleOutcome::fail(
        RuleId::AllowedSymbols,
        penalty,
        format!(
            "Remove special symbols ({}); stick to letters, digits and . , | $ - ( ) ' _ @ ~",
            distinct.iter().collect::<String>()
        ),
    )
    .with_debug(format!("{} disallowed character(s)", offending.len()))
}

fn check_paragraph_spacing(ctx: &RuleContext<'_>) -> RuleOutcome {
    let blocks = ctx
        .document
        .text()
        .split("\n\n")
        .filter(|block| block.trim().chars().count() > ctx.penalties.min_block_chars)
        .count();

    if blocks < ctx.penalties.min_paragraph_blocks {
        RuleOutcome::fail(
            RuleId::ParagraphSpacing,
            ctx.penalties.paragraph_spacing,
            "Add blank lines between sections.",
        )
        .with_debug(format!("{} substantial paragraph block(s)", blocks))
    } else {
        RuleOutcome::pass(RuleId::ParagraphSpacing)
    }
}

fn check_section_headings(ctx: &RuleContext<'_>) -> RuleOutcome {
    let headings = ctx
        .document
        .lines()
        .into_iter()
        .filter(|line| line.chars().count() > 3 && (is_all_uppercase(line) || line.ends_with(':')))
        .count();

    if headings < ctx.penalties.min_headings {
        RuleOutcome::fail(
            RuleId::SectionHeadings,
            ctx.penalties.section_headings,
            "Use clear section headings (e.g. WORK EXPERIENCE or Education:).",
        )
        .with_debug(format!("{} heading line(s)", headings))
    } else {
        RuleOutcome::pass(RuleId::SectionHeadings)
    }
}

fn check_professional_summary(ctx: &RuleContext<'_>) -> RuleOutcome {
    let penalties = ctx.penalties;

    match ctx.document.section(SectionType::Summary) {
        Some(body) if body.chars().count() >= penalties.summary_min_chars => {
            let sentences = split_sentences(body).len();
            if sentences > penalties.summary_max_sentences {
                RuleOutcome::fail(
                    RuleId::ProfessionalSummary,
                    penalties.summary_too_long,
                    format!(
                        "Shorten the Professional Summary to {} sentences or fewer.",
                        penalties.summary_max_sentences
                    ),
                )
                .with_debug(format!("Summary has {} sentences", sentences))
            } else {
                RuleOutcome::pass(RuleId::ProfessionalSummary)
            }
        }
        found => RuleOutcome::fail(
            RuleId::ProfessionalSummary,
            penalties.summary_missing,
            "Add a Professional Summary section of two or three sentences.",
        )
        .with_debug(match found {
            Some(body) => format!("Summary too short ({} chars)", body.chars().count()),
            None => "Summary heading not found".to_string(),
        }),
    }
}

fn check_work_experience(ctx: &RuleContext<'_>) -> RuleOutcome {
    let penalties = ctx.penalties;

    let body = match ctx.document.section(SectionType::Experience) {
        Some(body) if body.chars().count() >= penalties.experience_min_chars => body,
        found => {
            return RuleOutcome::fail(
                RuleId::WorkExperience,
                penalties.experience_missing,
                "Add a Work Experience section with 'Role - Company (dates)' headers and bullet points.",
            )
            .with_debug(match found {
                Some(body) => format!("Work Experience too short ({} chars)", body.chars().count()),
                None => "Work Experience heading not found".to_string(),
            });
        }
    };

    let assessment = experience::assess(body, penalties.action_verb_ratio);
    let mut penalty = assessment.defects.len() as f64 * penalties.experience_defect;
    let mut messages = assessment.defects.clone();
    if !assessment.has_any_metric {
        penalty += penalties.experience_no_metrics;
        messages.push("Add numbers (%, revenue, team size) to your experience bullets.".to_string());
    }
    let penalty = penalty.min(penalties.experience_cap);

    if penalty <= 0.0 {
        return RuleOutcome::pass(RuleId::WorkExperience);
    }

    RuleOutcome::fail(RuleId::WorkExperience, penalty, messages.join(" ")).with_debug(format!(
        "{} entries, {} defect(s), metrics present: {}",
        assessment.entries.len(),
        assessment.defects.len(),
        assessment.has_any_metric
    ))
}

fn check_metrics(ctx: &RuleContext<'_>) -> RuleOutcome {
    if ctx.document.text().chars().any(|c| c.is_ascii_digit()) {
        RuleOutcome::pass(RuleId::Metrics)
    } else {
        RuleOutcome::fail(
            RuleId::Metrics,
            ctx.penalties.metrics_missing,
            "Add metrics (% growth, revenue, numbers) to quantify achievements.",
        )
        .with_debug("No digits found")
    }
}

fn malformed_lines(body: &str, well_formed: impl Fn(&str) -> bool) -> Vec<String> {
    non_empty_lines(body)
        .into_iter()
        .filter(|line| !well_formed(line))
        .map(str::to_string)
        .collect()
}

fn check_education_format(ctx: &RuleContext<'_>) -> RuleOutcome {
    let Some(body) = ctx.document.section(SectionType::Education) else {
        return RuleOutcome::pass(RuleId::EducationFormat);
    };

    let malformed = malformed_lines(body, |line| line.contains(',') && YEAR.is_match(line));
    if malformed.is_empty() {
        RuleOutcome::pass(RuleId::EducationFormat)
    } else {
        RuleOutcome::fail(
            RuleId::EducationFormat,
            ctx.penalties.education_format,
            "Write each Education line as 'Degree, Institution, Year'.",
        )
        .with_debug(format!("Malformed: {}", preview(&malformed, 3)))
    }
}

fn check_certificates_format(ctx: &RuleContext<'_>) -> RuleOutcome {
    let Some(body) = ctx.document.section(SectionType::Certifications) else {
        return RuleOutcome::pass(RuleId::CertificatesFormat);
    };

    let malformed = malformed_lines(body, |line| SPACED_HYPHEN.is_match(line) && YEAR.is_match(line));
    if malformed.is_empty() {
        RuleOutcome::pass(RuleId::CertificatesFormat)
    } else {
        RuleOutcome::fail(
            RuleId::CertificatesFormat,
            ctx.penalties.certificates_format,
            "Write each certificate as 'Certificate - Issuer, Year'.",
        )
        .with_debug(format!("Malformed: {}", preview(&malformed, 3)))
    }
}

fn check_spelling(ctx: &RuleContext<'_>) -> RuleOutcome {
    let text = URL_OR_EMAIL.replace_all(ctx.document.text(), " ");

    let misses: Vec<String> = match ctx.dictionary {
        Some(dictionary) => spelling::misspelled_words(&text, dictionary),
        None => spelling::fallback_typos(&text),
    }
    .into_iter()
    .collect();

    if misses.is_empty() {
        return RuleOutcome::pass(RuleId::Spelling);
    }

    let divisor = ctx.penalties.spelling_divisor.max(1);
    let steps = misses.len().div_ceil(divisor) as f64;
    let penalty = steps.min(ctx.penalties.spelling_cap);

    RuleOutcome::fail(
        RuleId::Spelling,
        penalty,
        format!(
            "{} possible spelling issue(s): {}.",
            misses.len(),
            preview(&misses, 10)
        ),
    )
    .with_debug(format!(
        "{} word(s) failed {}",
        misses.len(),
        if ctx.dictionary.is_some() { "dictionary check" } else { "fallback typo check" }
    ))
}
