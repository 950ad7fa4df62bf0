//! Configuration management for the resume scorer

use crate::error::{Result, ResumeScorerError};
use crate::processing::rules::RuleId;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub spelling: SpellingConfig,
    pub extraction: ExtractionConfig,
    pub ai: AiConfig,
    pub record: RecordConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

/// Penalty table and thresholds for the rule set.
///
/// Every rule reads its constants from here, so a different house style is a
/// config change rather than a code change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub name_missing: f64,
    pub phone_missing: f64,
    pub email_missing: f64,
    pub link_missing: f64,
    pub location_missing: f64,
    pub images: f64,
    pub tables: f64,
    pub multi_column: f64,
    /// Lines with 4+ consecutive spaces tolerated before the layout counts as columns.
    pub multi_column_line_limit: usize,
    pub us_spelling: f64,
    pub symbol_cap: f64,
    pub symbol_divisor: f64,
    pub paragraph_spacing: f64,
    pub min_paragraph_blocks: usize,
    pub min_block_chars: usize,
    pub section_headings: f64,
    pub min_headings: usize,
    pub summary_missing: f64,
    pub summary_too_long: f64,
    pub summary_min_chars: usize,
    pub summary_max_sentences: usize,
    pub experience_missing: f64,
    pub experience_min_chars: usize,
    pub experience_defect: f64,
    pub experience_no_metrics: f64,
    pub experience_cap: f64,
    pub action_verb_ratio: f64,
    pub metrics_missing: f64,
    pub education_format: f64,
    pub certificates_format: f64,
    pub spelling_divisor: usize,
    pub spelling_cap: f64,
    pub disabled_rules: Vec<RuleId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary_url: Option<String>,
    /// Hunspell affix file; defaults to the `.aff` next to a `.dic` dictionary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affix_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affix_url: Option<String>,
    pub load_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub timeout_secs: u64,
    pub enable_caching: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    pub enabled: bool,
    pub csv_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub show_debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl OutputFormat {
    /// Console output is printed section by section as results arrive; the
    /// machine formats are emitted as one document.
    pub fn streams_sections(&self) -> bool {
        matches!(self, OutputFormat::Console)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            name_missing: 10.0,
            phone_missing: 3.0,
            email_missing: 3.0,
            link_missing: 2.0,
            location_missing: 2.0,
            images: 10.0,
            tables: 10.0,
            multi_column: 5.0,
            multi_column_line_limit: 10,
            us_spelling: 3.0,
            symbol_cap: 10.0,
            symbol_divisor: 2.0,
            paragraph_spacing: 2.0,
            min_paragraph_blocks: 2,
            min_block_chars: 30,
            section_headings: 2.0,
            min_headings: 2,
            summary_missing: 8.0,
            summary_too_long: 4.0,
            summary_min_chars: 20,
            summary_max_sentences: 6,
            experience_missing: 12.0,
            experience_min_chars: 20,
            experience_defect: 3.0,
            experience_no_metrics: 6.0,
            experience_cap: 25.0,
            action_verb_ratio: 0.6,
            metrics_missing: 10.0,
            education_format: 3.0,
            certificates_format: 3.0,
            spelling_divisor: 10,
            spelling_cap: 5.0,
            disabled_rules: Vec::new(),
        }
    }
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            dictionary_path: None,
            dictionary_url: None,
            affix_path: None,
            affix_url: None,
            load_timeout_secs: 5,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            enable_caching: true,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-pro-latest".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        let csv_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resume-scorer")
            .join("evaluations.csv");

        Self {
            enabled: true,
            csv_path,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            show_debug: false,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            ResumeScorerError::Configuration(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-scorer")
            .join("config.toml")
    }
}

impl ScoringConfig {
    pub fn is_rule_enabled(&self, rule: RuleId) -> bool {
        !self.disabled_rules.contains(&rule)
    }
}
