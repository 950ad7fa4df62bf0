//! Gemini `generateContent` client for structured extraction

use crate::config::AiConfig;
use crate::error::{Result, ResumeScorerError};
use crate::llm::analyzer::{parse_extraction, StructuredExtraction};
use crate::llm::prompts::PromptTemplates;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Anything that turns resume text into a [`StructuredExtraction`].
pub trait ExtractionService {
    fn extract(&self, resume_text: &str) -> impl Future<Output = Result<StructuredExtraction>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// First text part of the first candidate, or an empty string.
fn response_text(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    Ok(response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .unwrap_or_default())
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    prompts: PromptTemplates,
}

impl GeminiClient {
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            prompts: PromptTemplates::default(),
        })
    }

    /// Build a client with the key read from the environment variable named in config.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ResumeScorerError::Configuration(format!(
                "Environment variable {} is not set; it must hold the extraction service API key",
                config.api_key_env
            ))
        })?;
        Self::new(config, api_key)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Send one prompt and return the model's raw text reply.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        debug!("Calling {} ({} prompt chars)", self.url(), prompt.len());
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ResumeScorerError::AiApi {
                status: status.as_u16(),
                message,
            });
        }

        response_text(&body)
    }
}

impl ExtractionService for GeminiClient {
    async fn extract(&self, resume_text: &str) -> Result<StructuredExtraction> {
        let prompt = self.prompts.render_extraction(resume_text);
        let raw = self.generate(&prompt).await?;
        let extraction = parse_extraction(&raw)?;
        info!(
            "Extraction completed for '{}' ({})",
            extraction.personal_data.name, self.model
        );
        Ok(extraction)
    }
}
