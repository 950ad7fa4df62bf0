//! CLI interface for the resume scorer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Extensions accepted for resume files
pub const RESUME_EXTENSIONS: [&str; 5] = ["pdf", "docx", "txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "resume-scorer")]
#[command(about = "Rule-based ATS-friendliness scorer for resumes")]
#[command(long_about = "Score a resume's ATS friendliness from 0 to 100 with itemized suggestions, and optionally extract candidate details through a generative-language API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume file, inline text, or stdin
    Score {
        /// Path to resume file (PDF, DOCX, TXT, MD); reads stdin when omitted
        #[arg(conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Score this text instead of a file
        #[arg(short, long)]
        text: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to this file, or into this directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show the per-rule debug log
        #[arg(short, long)]
        debug: bool,

        /// Word list, or Hunspell .dic file with its .aff alongside, for the spelling check
        #[arg(long, conflicts_with = "no_dictionary")]
        dictionary: Option<PathBuf>,

        /// Use the built-in typo list even if a dictionary is configured
        #[arg(long)]
        no_dictionary: bool,
    },

    /// Score a resume, then extract candidate details and category ratings with AI
    Analyze {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        file: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Show the per-rule debug log
        #[arg(short, long)]
        debug: bool,

        /// Do not append the result to the evaluation record
        #[arg(long, conflicts_with = "record")]
        no_record: bool,

        /// Append the result to this CSV file instead of the configured one
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Serve the score and extraction flow over HTTP (POST /api/process-resume)
    Serve {
        /// Address to listen on instead of the configured one
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Do not append results to the evaluation record
        #[arg(long)]
        no_record: bool,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_score_with_text() {
        let cli = Cli::parse_from(["resume-scorer", "score", "--text", "JOHN SMITH", "-o", "json", "--debug"]);
        match cli.command {
            Commands::Score { file, text, output, debug, .. } => {
                assert!(file.is_none());
                assert_eq!(text.as_deref(), Some("JOHN SMITH"));
                assert_eq!(output.as_deref(), Some("json"));
                assert!(debug);
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_file_and_text_conflict() {
        let parsed = Cli::try_parse_from(["resume-scorer", "score", "cv.pdf", "--text", "x"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_parse_serve_bind_address() {
        let cli = Cli::parse_from(["resume-scorer", "serve", "--bind", "0.0.0.0:9000", "--no-record"]);
        match cli.command {
            Commands::Serve { bind, no_record } => {
                assert_eq!(bind, Some(SocketAddr::from(([0, 0, 0, 0], 9000))));
                assert!(no_record);
            }
            _ => panic!("expected serve command"),
        }
        assert!(Cli::try_parse_from(["resume-scorer", "serve", "--bind", "localhost"]).is_err());
    }

    #[test]
    fn test_output_formats() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_file_extensions() {
        assert!(validate_file_extension(Path::new("cv.DOCX"), &RESUME_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("cv.xyz"), &RESUME_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("cv"), &RESUME_EXTENSIONS).is_err());
    }
}
