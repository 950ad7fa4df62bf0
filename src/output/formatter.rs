//! Output formatters for console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{Result, ResumeScorerError};
use crate::llm::analyzer::StructuredExtraction;
use crate::output::report::{EvaluationReport, ScoreBand};
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String>;
    fn format_extraction(&self, extraction: &StructuredExtraction) -> Result<String>;
}

pub struct ConsoleFormatter {
    use_colors: bool,
    show_debug: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    show_debug: bool,
}

/// Dispatches to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

const ALL_CHECKS_PASSED: &str = "All checks passed";

impl ConsoleFormatter {
    pub fn new(use_colors: bool, show_debug: bool) -> Self {
        Self { use_colors, show_debug }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn band_color(band: ScoreBand) -> Color {
        match band {
            ScoreBand::Strong => Color::Green,
            ScoreBand::Fair => Color::Yellow,
            ScoreBand::Weak => Color::Red,
        }
    }

    fn format_score_badge(&self, band: ScoreBand) -> String {
        if self.use_colors {
            format!("[{}]", band.label().color(Self::band_color(band)).bold())
        } else {
            format!("[{}]", band.label())
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        let mut output = String::new();
        let score = &report.score;

        output.push_str(&self.format_header("📊 RESUME ATS SCORE", 1));
        output.push_str(&format!(
            "Generated: {} | Source: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.source
        ));

        output.push_str(&format!(
            "\nScore: {} {}\n",
            self.colorize(&format!("{}/100", score.final_score), Self::band_color(report.band)),
            self.format_score_badge(report.band)
        ));
        output.push_str(&format!("{}\n", self.colorize(report.band.verdict(), Color::Cyan)));

        if !score.suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 2));
            for (index, suggestion) in score.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", index + 1, suggestion));
            }
        }

        if self.show_debug {
            output.push_str(&self.format_header("Debug", 3));
            if score.debug_log.is_empty() {
                output.push_str(&format!("  {}\n", self.colorize(ALL_CHECKS_PASSED, Color::Green)));
            } else {
                for line in &score.debug_log {
                    output.push_str(&format!("  • {}\n", self.colorize(line, Color::BrightBlack)));
                }
            }
        }

        if let Some(extraction) = &report.extraction {
            output.push_str(&self.format_extraction(extraction)?);
        }

        Ok(output)
    }

    fn format_extraction(&self, extraction: &StructuredExtraction) -> Result<String> {
        let mut output = String::new();
        let person = &extraction.personal_data;

        output.push_str(&self.format_header("🤖 AI Extraction", 2));
        output.push_str(&format!("Name:  {}\n", person.name));
        output.push_str(&format!("Email: {}\n", person.email));
        output.push_str(&format!("Phone: {}\n", person.phone));
        output.push_str(&format!("Role:  {}\n", person.latest_job_role));

        output.push_str(&self.format_header("Category Scores", 3));
        let rows = [
            ("Formatting", extraction.scores.formatting, &extraction.comments.formatting),
            ("Content", extraction.scores.content, &extraction.comments.content),
            ("Contact", extraction.scores.contact, &extraction.comments.contact),
        ];
        for (category, value, comment) in rows {
            output.push_str(&format!(
                "  {:<11} {:>5.1}  {}\n",
                self.colorize(category, Color::Cyan),
                value,
                comment
            ));
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn format_extraction(&self, extraction: &StructuredExtraction) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(extraction)?)
        } else {
            Ok(serde_json::to_string(extraction)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, show_debug: bool) -> Self {
        Self {
            include_metadata,
            show_debug,
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        let mut output = String::new();
        let score = &report.score;

        output.push_str("# 📊 Resume ATS Score\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Source:** `{}`\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.source
            ));
        }

        output.push_str(&format!(
            "**Score:** {}/100 ({})\n\n{}\n\n",
            score.final_score,
            report.band.label(),
            report.band.verdict()
        ));

        if !score.suggestions.is_empty() {
            output.push_str("## Suggestions\n\n");
            for (index, suggestion) in score.suggestions.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", index + 1, suggestion));
            }
            output.push('\n');
        }

        if self.show_debug {
            output.push_str("## Debug\n\n");
            if score.debug_log.is_empty() {
                output.push_str(&format!("{}\n", ALL_CHECKS_PASSED));
            } else {
                for line in &score.debug_log {
                    output.push_str(&format!("- `{}`\n", line));
                }
            }
            output.push('\n');
        }

        if let Some(extraction) = &report.extraction {
            output.push_str(&self.format_extraction(extraction)?);
        }

        Ok(output)
    }

    fn format_extraction(&self, extraction: &StructuredExtraction) -> Result<String> {
        let person = &extraction.personal_data;
        let mut output = String::from("## 🤖 AI Extraction\n\n");

        output.push_str(&format!(
            "**Name:** {} | **Email:** {} | **Phone:** {} | **Role:** {}\n\n",
            person.name, person.email, person.phone, person.latest_job_role
        ));
        output.push_str("| Category | Score | Comment |\n");
        output.push_str("|----------|-------|---------|\n");
        output.push_str(&format!(
            "| Formatting | {:.1} | {} |\n",
            extraction.scores.formatting, extraction.comments.formatting
        ));
        output.push_str(&format!(
            "| Content | {:.1} | {} |\n",
            extraction.scores.content, extraction.comments.content
        ));
        output.push_str(&format!(
            "| Contact | {:.1} | {} |\n",
            extraction.scores.contact, extraction.comments.contact
        ));

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, show_debug: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, show_debug),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata, show_debug),
        }
    }

    fn formatter(&self, format: &OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_report(&self, report: &EvaluationReport, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_extraction(&self, extraction: &StructuredExtraction, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_extraction(extraction)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content).map_err(|e| {
        ResumeScorerError::OutputFormatting(format!(
            "Cannot write report to {}: {}",
            file_path.display(),
            e
        ))
    })
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty() && !stem.starts_with('<'))
        .unwrap_or_else(|| "resume".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_score{}.{}", base_name, timestamp_suffix, extension)
}
