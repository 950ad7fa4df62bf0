//! resume-scorer: rule-based ATS-friendliness scoring for resumes

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_scorer::cli::{self, Cli, Commands, ConfigAction, RESUME_EXTENSIONS};
use resume_scorer::config::{Config, OutputFormat};
use resume_scorer::error::{Result, ResumeScorerError};
use resume_scorer::input::InputManager;
use resume_scorer::llm::{ExtractionService, GeminiClient, StructuredExtraction};
use resume_scorer::output::formatter::{save_report_to_file, suggest_filename};
use resume_scorer::output::{CsvRecordSink, EvaluationRecord, EvaluationReport, RecordSink, ReportGenerator};
use resume_scorer::processing::spelling::load_dictionary;
use resume_scorer::processing::ScoringEngine;
use resume_scorer::server::{self, AppState};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        if e.is_input_error() {
            eprintln!("💡 Supported resume formats: {}", RESUME_EXTENSIONS.join(", "));
        }
        process::exit(1);
    }
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(ResumeScorerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn read_resume_file(path: &Path, config: &Config) -> Result<String> {
    cli::validate_file_extension(path, &RESUME_EXTENSIONS)
        .map_err(|e| ResumeScorerError::InvalidInput(format!("Resume file: {}", e)))?;

    let mut input_manager = InputManager::from_config(&config.extraction);
    input_manager.extract_text(path).await
}

async fn build_engine(config: &Config, dictionary: Option<PathBuf>, no_dictionary: bool) -> ScoringEngine {
    let engine = ScoringEngine::from_config(config);
    if no_dictionary {
        return engine;
    }

    let mut spelling = config.spelling.clone();
    if dictionary.is_some() {
        spelling.dictionary_path = dictionary;
    }

    match load_dictionary(&spelling).await {
        Some(dictionary) => engine.with_dictionary(dictionary),
        None => engine,
    }
}

/// Structured extraction behind a spinner.
async fn request_extraction(config: &Config, resume_text: &str) -> Result<StructuredExtraction> {
    let client = GeminiClient::from_config(&config.ai)?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Extracting candidate details with {}...", client.model()));

    let extraction = client.extract(resume_text).await;
    spinner.finish_and_clear();
    extraction
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Score {
            file,
            text,
            output,
            save,
            debug,
            dictionary,
            no_dictionary,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;

            let (source, resume_text) = match (text, file) {
                (Some(text), _) => ("<text>".to_string(), text),
                (None, Some(path)) => (path.display().to_string(), read_resume_file(&path, &config).await?),
                (None, None) => {
                    let mut buffer = String::new();
                    tokio::io::stdin().read_to_string(&mut buffer).await?;
                    ("<stdin>".to_string(), buffer)
                }
            };

            let engine = build_engine(&config, dictionary, no_dictionary).await;
            info!(
                "Scoring {} with {} rules ({})",
                source,
                engine.rules().len(),
                if engine.has_dictionary() { "dictionary" } else { "fallback typo list" }
            );

            let report = EvaluationReport::new(source.as_str(), engine.evaluate(&resume_text));
            let generator = ReportGenerator::with_options(
                config.output.color_output,
                debug || config.output.show_debug,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &format)?;
            println!("{}", rendered);

            if let Some(path) = save {
                let path = if path.is_dir() {
                    path.join(suggest_filename(&format, &source, true))
                } else {
                    path
                };
                save_report_to_file(&rendered, &path)?;
                info!("Report saved to {}", path.display());
            }
        }

        Commands::Analyze {
            file,
            output,
            debug,
            no_record,
            record,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let resume_text = read_resume_file(&file, &config).await?;

            let engine = build_engine(&config, None, false).await;
            let report = EvaluationReport::new(file.display().to_string(), engine.evaluate(&resume_text));
            let generator = ReportGenerator::with_options(
                config.output.color_output,
                debug || config.output.show_debug,
                true,
                true,
            );

            // console shows the local score before the extraction call can fail
            let streams = format.streams_sections();
            if streams {
                println!("{}", generator.generate_report(&report, &format)?);
            }

            let extraction = match request_extraction(&config, &resume_text).await {
                Ok(extraction) => extraction,
                Err(e) => {
                    if !streams {
                        println!("{}", generator.generate_report(&report, &format)?);
                    }
                    return Err(e);
                }
            };

            if streams {
                println!("{}", generator.generate_extraction(&extraction, &format)?);
            } else {
                let combined = report.with_extraction(extraction.clone());
                println!("{}", generator.generate_report(&combined, &format)?);
            }

            let record_path = match (no_record, record) {
                (true, _) => None,
                (false, Some(path)) => Some(path),
                (false, None) if config.record.enabled => Some(config.record.csv_path.clone()),
                (false, None) => None,
            };

            match record_path {
                Some(path) => {
                    let sink = CsvRecordSink::new(path);
                    sink.append(&EvaluationRecord::from_extraction(&extraction))?;
                    info!("Recorded in {}", sink.path().display());
                }
                None => warn!("Evaluation record disabled; extraction not stored"),
            }
        }

        Commands::Serve { bind, no_record } => {
            let engine = build_engine(&config, None, false).await;
            let service = Arc::new(GeminiClient::from_config(&config.ai)?);
            let input = InputManager::from_config(&config.extraction);

            let mut state = AppState::new(engine, input, service)
                .with_max_upload_bytes(config.server.max_upload_bytes);
            if !no_record && config.record.enabled {
                info!("Recording evaluations in {}", config.record.csv_path.display());
                state = state.with_record_sink(Arc::new(CsvRecordSink::new(config.record.csv_path.clone())));
            } else {
                warn!("Evaluation record disabled; extractions not stored");
            }

            server::serve(bind.unwrap_or(config.server.bind), state).await?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeScorerError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset: {}", config_path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}
