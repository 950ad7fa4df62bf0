//! Resume document structure and section extraction

use crate::processing::text_processor::{self, normalize};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A resume ready for rule evaluation.
///
/// Keeps the raw text next to the normalized display text: layout checks
/// (tabs, space-aligned columns) need whitespace that normalization removes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    raw: String,
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    Summary,
    Experience,
    Education,
    Certifications,
    Skills,
    Projects,
    Awards,
    Languages,
    Interests,
    References,
}

impl SectionType {
    pub const ALL: [SectionType; 10] = [
        SectionType::Summary,
        SectionType::Experience,
        SectionType::Education,
        SectionType::Certifications,
        SectionType::Skills,
        SectionType::Projects,
        SectionType::Awards,
        SectionType::Languages,
        SectionType::Interests,
        SectionType::References,
    ];

    fn labels(&self) -> &'static str {
        match self {
            SectionType::Summary => {
                r"professional\s+summary|career\s+summary|summary|professional\s+profile|profile|career\s+objective|objective|about\s+me"
            }
            SectionType::Experience => {
                r"work\s+experience|professional\s+experience|employment\s+history|work\s+history|experience|employment"
            }
            SectionType::Education => r"education|academic\s+qualifications|academic\s+background|qualifications",
            SectionType::Certifications => r"certifications|certificates|certification|licenses|licences",
            SectionType::Skills => r"technical\s+skills|key\s+skills|core\s+competencies|skills",
            SectionType::Projects => r"projects|key\s+projects",
            SectionType::Awards => r"awards|honou?rs|achievements|accomplishments",
            SectionType::Languages => r"languages",
            SectionType::Interests => r"interests|hobbies",
            SectionType::References => r"references",
        }
    }

    /// Heading regex: the label opens a line and is followed by a colon or the line end.
    pub fn heading_pattern(&self) -> &'static Regex {
        &HEADINGS[*self as usize]
    }
}

static HEADINGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    SectionType::ALL
        .iter()
        .map(|section| {
            Regex::new(&format!(
                r"(?im)^[^\S\n]*(?:{})[^\S\n]*(?::|$)",
                section.labels()
            ))
            .expect("Invalid section heading regex")
        })
        .collect()
});

/// Body of the first section introduced by `heading`, up to the nearest
/// following line that matches one of `stops`, or to the end of the text.
///
/// `None` means the heading is absent. The body is trimmed and may be empty.
pub fn extract_section<'a>(text: &'a str, heading: &Regex, stops: &[&Regex]) -> Option<&'a str> {
    let heading_match = heading.find(text)?;
    let body_start = heading_match.end();

    let body_end = stops
        .iter()
        .filter_map(|stop| stop.find_at(text, body_start).map(|m| m.start()))
        .min()
        .unwrap_or(text.len());

    Some(text[body_start..body_end].trim())
}

impl ResumeDocument {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            text: normalize(raw),
        }
    }

    /// Text as received, before normalization.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized display text every content rule reads.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> Vec<&str> {
        text_processor::non_empty_lines(&self.text)
    }

    /// Body of a labelled section; every other known label ends it.
    pub fn section(&self, section: SectionType) -> Option<&str> {
        let stops: Vec<&Regex> = SectionType::ALL
            .iter()
            .filter(|other| **other != section)
            .map(SectionType::heading_pattern)
            .collect();

        extract_section(&self.text, section.heading_pattern(), &stops)
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionType::Summary => write!(f, "Professional Summary"),
            SectionType::Experience => write!(f, "Work Experience"),
            SectionType::Education => write!(f, "Education"),
            SectionType::Certifications => write!(f, "Certificates"),
            SectionType::Skills => write!(f, "Skills"),
            SectionType::Projects => write!(f, "Projects"),
            SectionType::Awards => write!(f, "Awards"),
            SectionType::Languages => write!(f, "Languages"),
            SectionType::Interests => write!(f, "Interests"),
            SectionType::References => write!(f, "References"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "JOHN SMITH\nProfessional Summary:\nExperienced marketing manager.\n\nWork Experience:\n- Led team of 5\n\nEducation\nMBA, Delhi University, 2015";

    #[test]
    fn test_document_keeps_raw_copy() {
        let doc = ResumeDocument::new("Name\tSurname\n\n\n\nSummary");
        assert!(doc.raw().contains('\t'));
        assert_eq!(doc.text(), "Name Surname\n\nSummary");
    }

    #[test]
    fn test_section_detection() {
        let doc = ResumeDocument::new(SAMPLE);

        assert_eq!(doc.section(SectionType::Summary), Some("Experienced marketing manager."));
        assert_eq!(doc.section(SectionType::Experience), Some("- Led team of 5"));
        assert_eq!(doc.section(SectionType::Education), Some("MBA, Delhi University, 2015"));
        assert_eq!(doc.section(SectionType::Certifications), None);
    }

    #[test]
    fn test_heading_must_open_a_line() {
        let doc = ResumeDocument::new("Experienced engineer with education in physics\nSkills: Rust");
        assert_eq!(doc.section(SectionType::Experience), None);
        assert_eq!(doc.section(SectionType::Education), None);
        assert_eq!(doc.section(SectionType::Skills), Some("Rust"));
    }

    #[test]
    fn test_extract_section_without_stop_runs_to_end() {
        let heading = Regex::new(r"(?im)^awards:?").unwrap();
        let stop = Regex::new(r"(?im)^education").unwrap();
        let body = extract_section("Awards:\nBest Seller 2020\nTop Closer 2021", &heading, &[&stop]);
        assert_eq!(body, Some("Best Seller 2020\nTop Closer 2021"));
    }

    #[test]
    fn test_extract_section_stops_at_nearest_label() {
        let heading = Regex::new(r"(?im)^summary:?").unwrap();
        let education = Regex::new(r"(?im)^education").unwrap();
        let awards = Regex::new(r"(?im)^awards").unwrap();
        let text = "Summary\nGood at sales\nAwards\nTop seller\nEducation\nBA";
        assert_eq!(extract_section(text, &heading, &[&education, &awards]), Some("Good at sales"));
    }

    #[test]
    fn test_missing_heading_is_none() {
        let heading = Regex::new(r"(?im)^summary:?").unwrap();
        assert_eq!(extract_section("", &heading, &[]), None);
        assert_eq!(extract_section("nothing here", &heading, &[]), None);
    }
}
