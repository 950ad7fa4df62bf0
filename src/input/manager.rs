//! Input manager for handling different file types

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeScorerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
    timeout: Duration,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            cache: HashMap::new(),
            enable_cache: defaults.enable_caching,
            timeout: Duration::from_secs(defaults.timeout_secs),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_cache(config.enable_caching)
            .with_timeout(Duration::from_secs(config.timeout_secs))
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeScorerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let extension = self.detect_extension(path)?;
        if !FileType::from_extension(&extension).is_supported() {
            return Err(ResumeScorerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        let bytes = tokio::fs::read(path).await?;
        info!("Extracting text from {} ({} bytes)", path.display(), bytes.len());
        let text = self.extract_bytes(bytes, &extension).await?;

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Decode in-memory bytes on a blocking thread, bounded by the configured timeout.
    pub async fn extract_bytes(&self, bytes: Vec<u8>, declared: &str) -> Result<String> {
        let declared = declared.to_string();
        let task = tokio::task::spawn_blocking(move || text_extractor::extract_bytes(&bytes, &declared));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ResumeScorerError::ExtractionFailed(format!(
                "Extraction task failed: {}",
                join_error
            ))),
            Err(_) => {
                debug!("Extraction exceeded {:?}", self.timeout);
                Err(ResumeScorerError::ExtractionTimeout(self.timeout.as_secs()))
            }
        }
    }

    fn detect_extension(&self, path: &Path) -> Result<String> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ResumeScorerError::InvalidInput(format!("File has no extension: {}", path.display()))
            })
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
