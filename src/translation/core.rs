/*!
 * Core translation service implementation.
 *
 * This module contains the `Translator` capability and the `TranslationService`
 * that implements it on top of the configured provider.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::google::{GoogleRequest, GoogleTranslate};
use crate::providers::ollama::{GenerationRequest, Ollama};

/// Translates one piece of caption text
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`.
    ///
    /// Language identifiers are passed as configured (codes, names or `auto`);
    /// implementations resolve them to whatever their backend expects.
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Google Translate web endpoint
    Google {
        /// Client instance
        client: GoogleTranslate,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
        /// Model name
        model: String,
    },
}

/// Spaces request starts to honor a requests-per-minute limit
#[derive(Debug)]
struct RequestPacer {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestPacer {
    fn per_minute(rate_limit: u32) -> Option<Self> {
        if rate_limit == 0 {
            return None;
        }
        Some(Self {
            interval: Duration::from_millis(60_000 / rate_limit as u64),
            next_slot: Mutex::new(None),
        })
    }

    async fn wait(&self) {
        let start = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let start = match *next_slot {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            *next_slot = Some(start + self.interval);
            start
        };
        tokio::time::sleep_until(start).await;
    }
}

/// Main translation service for caption text
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Client-side rate limiting
    pacer: Option<RequestPacer>,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let retry_count = config.common.retry_count;
        let retry_backoff_ms = config.common.retry_backoff_ms;
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::Google => TranslationProviderImpl::Google {
                client: GoogleTranslate::new(config.get_endpoint(), timeout_secs, retry_count, retry_backoff_ms),
            },
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(config.get_endpoint(), timeout_secs, retry_count, retry_backoff_ms),
                model: config.get_model(),
            },
        };

        let pacer = config.get_rate_limit().and_then(RequestPacer::per_minute);

        info!(
            "Using {} for translation{}",
            config.provider.display_name(),
            match &provider {
                TranslationProviderImpl::Ollama { model, .. } => format!(" (model {})", model),
                TranslationProviderImpl::Google { .. } => String::new(),
            }
        );

        Ok(Self {
            provider,
            config,
            pacer,
        })
    }

    /// Build the system prompt for LLM providers from the configured template
    pub fn build_system_prompt(&self, source_language: &str, target_language: &str) -> String {
        let source_name = if language_utils::is_auto_detect(source_language) {
            "the language it is written in".to_string()
        } else {
            language_utils::get_language_name(source_language).unwrap_or_else(|_| source_language.to_string())
        };
        let target_name =
            language_utils::get_language_name(target_language).unwrap_or_else(|_| target_language.to_string());

        self.config
            .common
            .system_prompt
            .replace("{source_language}", &source_name)
            .replace("{target_language}", &target_name)
    }

    async fn translate_with_google(
        &self,
        client: &GoogleTranslate,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let source = language_utils::resolve_source_language(source_language)
            .map_err(|_| TranslationError::UnsupportedLanguage(source_language.to_string()))?;
        let target = language_utils::resolve_language(target_language)
            .map_err(|_| TranslationError::UnsupportedLanguage(target_language.to_string()))?;

        let response = client.complete(GoogleRequest::new(text, source, target)).await?;
        if let Some(detected) = &response.detected_language {
            debug!("Detected source language: {}", detected);
        }
        Ok(GoogleTranslate::extract_text(&response))
    }

    async fn translate_with_ollama(
        &self,
        client: &Ollama,
        model: &str,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let request = GenerationRequest::new(model, text)
            .system(self.build_system_prompt(source_language, target_language))
            .temperature(self.config.common.temperature);

        let response = client.complete(request).await?;
        Ok(Ollama::extract_text(&response))
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if let Some(pacer) = &self.pacer {
            pacer.wait().await;
        }

        let translated = match &self.provider {
            TranslationProviderImpl::Google { client } => {
                self.translate_with_google(client, text, source_language, target_language).await?
            }
            TranslationProviderImpl::Ollama { client, model } => {
                self.translate_with_ollama(client, model, text, source_language, target_language).await?
            }
        };

        if translated.trim().is_empty() {
            return Err(TranslationError::EmptyResponse(text.to_string()));
        }

        Ok(translated)
    }
}
