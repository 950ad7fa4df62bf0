//! Dictionary-based spell checking with a fixed-typo fallback

use crate::config::SpellingConfig;
use crate::error::{Result, ResumeScorerError};
use crate::processing::text_processor::word_tokens;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Typos checked when no dictionary is available.
pub const FALLBACK_TYPOS: [&str; 6] = ["teh", "adn", "recieve", "experiance", "seperate", "occured"];

static FALLBACK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", FALLBACK_TYPOS.join("|"))).expect("Invalid typo regex")
});

/// Word lookup capability injected into the scoring engine.
pub trait Dictionary: Send + Sync {
    fn check(&self, word: &str) -> bool;
}

impl<F> Dictionary for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn check(&self, word: &str) -> bool {
        self(word)
    }
}

/// In-memory plain word list, one word per line.
#[derive(Debug, Clone, Default)]
pub struct WordListDictionary {
    words: HashSet<String>,
}

impl WordListDictionary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// First whitespace-separated token of each line; blank lines and `#`
    /// comments are skipped.
    pub fn parse(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_string);

        Self::from_words(words)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Hunspell `.aff` + `.dic` pair with affix expansion, so `manage/DSG`
/// also accepts `managed`, `manages` and `managing`.
pub struct HunspellDictionary {
    inner: spellbook::Dictionary,
}

impl HunspellDictionary {
    pub fn new(affixes: &str, words: &str) -> Result<Self> {
        let inner = spellbook::Dictionary::new(affixes, words).map_err(|e| {
            ResumeScorerError::Configuration(format!("Invalid Hunspell dictionary: {}", e))
        })?;
        Ok(Self { inner })
    }
}

impl Dictionary for HunspellDictionary {
    fn check(&self, word: &str) -> bool {
        self.inner.check(word)
    }
}

impl Dictionary for WordListDictionary {
    fn check(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }

        let lower = word.to_lowercase();
        if self.words.contains(&lower) {
            return true;
        }

        let mut chars = lower.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => return false,
        };
        self.words.contains(&capitalized)
    }
}

/// Distinct tokens the dictionary rejects in both the given and lower case.
pub fn misspelled_words(text: &str, dictionary: &dyn Dictionary) -> BTreeSet<String> {
    word_tokens(text)
        .into_iter()
        .filter(|token| !dictionary.check(token) && !dictionary.check(&token.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Whole-word hits from [`FALLBACK_TYPOS`], lower-cased.
pub fn fallback_typos(text: &str) -> BTreeSet<String> {
    FALLBACK_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Where a dictionary file comes from.
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    fn is_hunspell_words(&self) -> bool {
        match self {
            Source::Path(path) => path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("dic")),
            Source::Url(url) => url.to_lowercase().ends_with(".dic"),
        }
    }

    /// The `.aff` file published next to a `.dic` file.
    fn affix_sibling(&self) -> Source {
        match self {
            Source::Path(path) => Source::Path(path.with_extension("aff")),
            Source::Url(url) => Source::Url(format!("{}.aff", &url[..url.len() - ".dic".len()])),
        }
    }

    async fn read(&self) -> Result<String> {
        match self {
            Source::Path(path) => Ok(tokio::fs::read_to_string(path).await?),
            Source::Url(url) => {
                let response = reqwest::get(url).await?.error_for_status()?;
                Ok(response.text().await?)
            }
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

fn word_source(config: &SpellingConfig) -> Option<Source> {
    match (&config.dictionary_path, &config.dictionary_url) {
        (Some(path), _) => Some(Source::Path(path.clone())),
        (None, Some(url)) => Some(Source::Url(url.clone())),
        (None, None) => None,
    }
}

/// Explicit affix file, else the sibling of a `.dic` word file.
fn affix_source(config: &SpellingConfig, words: &Source) -> Option<Source> {
    match (&config.affix_path, &config.affix_url) {
        (Some(path), _) => Some(Source::Path(path.clone())),
        (None, Some(url)) => Some(Source::Url(url.clone())),
        (None, None) if words.is_hunspell_words() => Some(words.affix_sibling()),
        (None, None) => None,
    }
}

async fn build_dictionary(words: &Source, affixes: Option<&Source>) -> Result<Arc<dyn Dictionary>> {
    let word_content = words.read().await?;

    if let Some(affixes) = affixes {
        let affix_content = affixes.read().await?;
        let dictionary = HunspellDictionary::new(&affix_content, &word_content)?;
        info!("Loaded Hunspell dictionary {} with affixes {}", words, affixes);
        return Ok(Arc::new(dictionary));
    }

    let dictionary = WordListDictionary::parse(&word_content);
    if dictionary.is_empty() {
        return Err(ResumeScorerError::Configuration(format!(
            "Dictionary '{}' contains no words",
            words
        )));
    }
    info!("Loaded {} dictionary words from {}", dictionary.len(), words);
    Ok(Arc::new(dictionary))
}

/// Load the configured dictionary once, giving up after the configured wait.
///
/// A `.dic` word file is paired with its `.aff` affix file. Any failure is
/// logged and yields `None`; scoring then uses the fallback list.
pub async fn load_dictionary(config: &SpellingConfig) -> Option<Arc<dyn Dictionary>> {
    let Some(words) = word_source(config) else {
        debug!("No dictionary configured, using fallback typo list");
        return None;
    };
    let affixes = affix_source(config, &words);
    let wait = Duration::from_secs(config.load_timeout_secs);

    match tokio::time::timeout(wait, build_dictionary(&words, affixes.as_ref())).await {
        Ok(Ok(dictionary)) => Some(dictionary),
        Ok(Err(e)) => {
            warn!("Failed to load dictionary '{}': {}, using fallback typo list", words, e);
            None
        }
        Err(_) => {
            warn!(
                "Dictionary '{}' not loaded within {}s, using fallback typo list",
                words, config.load_timeout_secs
            );
            None
        }
    }
}
