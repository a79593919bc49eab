/*!
 * Runtime configuration.
 *
 * Settings come from an optional JSON file (`conf.json` by default) and are
 * then overridden by command-line options. Every field has a default, so an
 * empty object and a missing file both give a usable configuration.
 */

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::encoding::{DEFAULT_ENCODING, SourceEncoding};
use crate::language_utils;

/// Top-level settings for a translation run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the captions: ISO code, English name or `auto`
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Language to translate into: ISO code or English name
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Encoding label used to decode input files
    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub log_level: LogLevel,
}

/// Backend used to translate caption text
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Public Google Translate web endpoint, no key needed
    #[default]
    Google,
    // @provider: Local Ollama server
    Ollama,
}

impl TranslationProvider {
    // @returns: Human readable name, used in log lines
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Identifier used in the `type` field of provider entries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Ollama => "ollama",
        }
    }
}

impl fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-provider connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Which provider this entry configures
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name, only meaningful for LLM backends
    #[serde(default)]
    pub model: String,

    // @field: Base URL, empty means the provider default
    #[serde(default)]
    pub endpoint: String,

    // @field: Request timeout, 0 means the provider default
    #[serde(default)]
    pub timeout_secs: u64,

    // @field: Requests per minute, unlimited when absent
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @returns: Entry filled with the defaults of `provider`
    pub fn new(provider: TranslationProvider) -> Self {
        let (model, endpoint, timeout_secs, rate_limit) = match provider {
            // The public endpoint starts refusing bursts well before this
            TranslationProvider::Google => ("", "https://translate.googleapis.com", 30, Some(120)),
            // Generation on a local model is slow, but never throttled
            TranslationProvider::Ollama => ("llama3.2:3b", "http://localhost:11434", 120, None),
        };

        Self {
            provider_type: provider.as_str().to_string(),
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            timeout_secs,
            rate_limit,
        }
    }
}

/// Provider selection plus the settings every provider shares
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Provider used for this run
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Known provider entries, looked up by their `type`
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Settings shared by all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt sent to LLM providers.
    /// `{source_language}` and `{target_language}` are replaced with language names.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Captions in flight at the same time (1 = strictly sequential)
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Retries after a transient provider failure
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// First retry delay in milliseconds, doubled on every further attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Sampling temperature for LLM providers
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            concurrent_requests: default_concurrent_requests(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Log verbosity, mirrors `log::LevelFilter`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    language_utils::AUTO_DETECT.to_string()
}

fn default_target_language() -> String {
    "english".to_string()
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.3
}

fn default_system_prompt() -> String {
    "You are a professional subtitle translator. Translate the subtitle line the user sends from {source_language} to {target_language}. Reply with the translation only, on a single line, without quotes or commentary.".to_string()
}

impl Config {
    /// Read settings from a JSON file.
    ///
    /// A missing file is not an error: defaults are returned and nothing is
    /// written to disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Check the settings before any input is read
    pub fn validate(&self) -> Result<()> {
        if !language_utils::is_auto_detect(&self.source_language) {
            language_utils::resolve_language(&self.source_language)
                .context("Invalid source language")?;
        }
        language_utils::resolve_language(&self.target_language)
            .context("Invalid target language")?;

        SourceEncoding::for_label(&self.encoding)?;

        if self.translation.common.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }

        url::Url::parse(&self.translation.get_endpoint())
            .with_context(|| format!("Invalid {} endpoint", self.translation.provider.display_name()))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            encoding: default_encoding(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Entry for the provider selected in `provider`
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Entry whose `type` names `provider`
    pub fn get_provider_config(&self, provider: &TranslationProvider) -> Option<&ProviderConfig> {
        self.available_providers
            .iter()
            .find(|entry| entry.provider_type.eq_ignore_ascii_case(provider.as_str()))
    }

    /// Mutable entry for the selected provider, added with defaults if missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider = self.provider;
        let position = self
            .available_providers
            .iter()
            .position(|entry| entry.provider_type.eq_ignore_ascii_case(provider.as_str()));

        let index = position.unwrap_or_else(|| {
            self.available_providers.push(ProviderConfig::new(provider));
            self.available_providers.len() - 1
        });
        &mut self.available_providers[index]
    }

    pub fn get_model(&self) -> String {
        self.get_active_provider_config()
            .map(|entry| entry.model.clone())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| ProviderConfig::new(self.provider).model)
    }

    pub fn get_endpoint(&self) -> String {
        self.get_active_provider_config()
            .map(|entry| entry.endpoint.clone())
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| ProviderConfig::new(self.provider).endpoint)
    }

    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|entry| entry.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(|| ProviderConfig::new(self.provider).timeout_secs)
    }

    /// Requests per minute for the active provider.
    ///
    /// An explicit entry is taken as is, so removing `rate_limit` from it
    /// disables pacing.
    pub fn get_rate_limit(&self) -> Option<u32> {
        match self.get_active_provider_config() {
            Some(entry) => entry.rate_limit,
            None => ProviderConfig::new(self.provider).rate_limit,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
