use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::path::Path;
use url::Url;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles loading, validating and saving the summariser settings.
/// Keys mirror the JSON file layout so a config written by hand round-trips.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Maximum number of whitespace tokens per chunk sent to the model
    pub token_limit: usize,

    /// Instruction prepended to every chunk
    pub prompt_template: String,

    /// Output artifact settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Pattern extraction tunables
    pub preprocessing: PreprocessingConfig,

    /// Whether to write `<base>-preprocessed.txt`
    #[serde(default)]
    pub save_preprocessed: bool,

    /// Document conversion settings
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Chat service settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Salience scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output artifact settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Suffix appended to the document base name for the final summary
    #[serde(default = "default_output_suffix")]
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_output_suffix(),
        }
    }
}

/// Tunables of the pattern extraction passes.
///
/// Every "proximity" is a window size counted in words or tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PreprocessingConfig {
    /// Words allowed between "TUTOR" and "MARKED"
    pub tutor_marked_proximity: usize,

    /// Largest question context moved to the questions file
    pub tutor_marked_max_words: usize,

    /// Largest conclusion/summary fragment moved to the metadata file
    pub summary_max_words: usize,

    /// Extra standalone numbers swallowed after a first one
    pub number_proximity: usize,

    /// Near-duplicate threshold on a 0-10 scale
    pub common_words_threshold: usize,

    /// Extra all-caps tokens allowed in one acronym run
    pub capital_proximity: usize,

    /// Largest table-of-contents entry moved to the metadata file
    pub toc_max_words: usize,

    /// Sentences with this many words or fewer are dropped
    #[serde(default = "default_min_sentence_words")]
    pub min_sentence_words: usize,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            tutor_marked_proximity: 2,
            tutor_marked_max_words: 60,
            summary_max_words: 80,
            number_proximity: 3,
            common_words_threshold: 7,
            capital_proximity: 3,
            toc_max_words: 20,
            min_sentence_words: default_min_sentence_words(),
        }
    }
}

/// Document conversion settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ConversionConfig {
    /// Convert PDF input to Markdown with the external converter
    #[serde(default)]
    pub pdf_to_md: bool,
}

/// Ollama chat service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model name (e.g., "llama3.2", "mistral")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Salience scoring settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScoringConfig {
    /// Key phrase mapped to the words treated as its synonyms
    #[serde(default = "default_salience_terms")]
    pub salience_terms: BTreeMap<String, Vec<String>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            salience_terms: default_salience_terms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_suffix() -> String {
    "_summarised.txt".to_string()
}

fn default_min_sentence_words() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_prompt_template() -> String {
    "Summarise the following course material. Keep definitions, key arguments and conclusions, and drop repetition.".to_string()
}

fn default_salience_terms() -> BTreeMap<String, Vec<String>> {
    let mut terms = BTreeMap::new();
    terms.insert(
        "important".to_string(),
        vec!["vital", "crucial", "essential", "significant", "key"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    terms.insert(
        "definition".to_string(),
        vec!["defined", "define", "means", "refers"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    terms.insert(
        "conclusion".to_string(),
        vec!["therefore", "thus", "hence", "consequently"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    terms
}

impl Config {
    /// Load a configuration file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::from_json(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from JSON text without validating it
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_limit == 0 {
            return Err(invalid("token_limit", "must be greater than zero"));
        }

        if self.prompt_template.trim().is_empty() {
            return Err(invalid("prompt_template", "must not be empty"));
        }

        if self.output.suffix.is_empty() {
            return Err(invalid("output.suffix", "must not be empty"));
        }

        if self.preprocessing.common_words_threshold > 10 {
            return Err(invalid(
                "preprocessing.common_words_threshold",
                "must be between 0 and 10",
            ));
        }

        if self.provider.model.trim().is_empty() {
            return Err(invalid("provider.model", "must not be empty"));
        }

        Url::parse(&self.provider.endpoint)
            .map_err(|e| invalid("provider.endpoint", &e.to_string()))?;

        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            token_limit: 2000,
            prompt_template: default_prompt_template(),
            output: OutputConfig::default(),
            preprocessing: PreprocessingConfig::default(),
            save_preprocessed: false,
            conversion: ConversionConfig::default(),
            provider: ProviderConfig::default(),
            scoring: ScoringConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
