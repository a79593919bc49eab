/*!
 * Tests for application configuration functionality
 */

use srt_translate::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};

use crate::common::{create_temp_dir, create_test_file};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "english");
    assert_eq!(config.encoding, "latin1");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.common.concurrent_requests, 1);
    assert_eq!(config.log_level, LogLevel::Info);

    let ollama_config = config
        .translation
        .get_provider_config(&TranslationProvider::Ollama)
        .expect("Ollama provider config should exist");
    assert_eq!(ollama_config.endpoint, "http://localhost:11434");
    assert_eq!(ollama_config.model, "llama3.2:3b");

    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "de".to_string();
    assert!(config.validate().is_ok());

    config.target_language = String::new();
    assert!(config.validate().is_err());
    config.target_language = "french".to_string();

    config.encoding = "not-an-encoding".to_string();
    assert!(config.validate().is_err());
    config.encoding = "utf-8".to_string();

    config.translation.common.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.translation.common.concurrent_requests = 4;

    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_load_withMissingFile_shouldReturnDefaults() {
    let dir = create_temp_dir().unwrap();
    let config = Config::load(dir.path().join("missing.json")).unwrap();

    assert_eq!(config.target_language, "english");
    assert!(!dir.path().join("missing.json").exists());
}

#[test]
fn test_config_load_withPartialJson_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let json = br#"{
        "target_language": "fr",
        "encoding": "utf-8",
        "translation": {
            "provider": "ollama",
            "available_providers": [
                { "type": "ollama", "model": "mistral", "endpoint": "http://gpu-box:11434" }
            ],
            "common": { "concurrent_requests": 3 }
        },
        "log_level": "debug"
    }"#;
    let path = create_test_file(dir.path(), "conf.json", json).unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.encoding, "utf-8");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_model(), "mistral");
    assert_eq!(config.translation.get_endpoint(), "http://gpu-box:11434");
    assert_eq!(config.translation.common.concurrent_requests, 3);
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_load_withInvalidJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "conf.json", b"{ not json").unwrap();

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_active_provider_config_mut_withMissingEntry_shouldCreateDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Ollama;

    config.translation.active_provider_config_mut().model = "phi3".to_string();

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_model(), "phi3");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
}

#[test]
fn test_provider_accessors_withoutProviderEntries_shouldFallBackToDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();

    assert_eq!(config.translation.get_endpoint(), "https://translate.googleapis.com");
    assert_eq!(config.translation.get_rate_limit(), Some(120));
    assert_eq!(config.translation.get_model(), "");

    config.translation.provider = TranslationProvider::Ollama;
    assert_eq!(config.translation.get_timeout_secs(), 120);
    assert_eq!(config.translation.get_rate_limit(), None);
}

#[test]
fn test_translation_provider_display_shouldUseConfigIdentifiers() {
    assert_eq!(TranslationProvider::Google.to_string(), "google");
    assert_eq!(TranslationProvider::Ollama.as_str(), "ollama");
    assert_eq!(TranslationProvider::Ollama.display_name(), "Ollama");
}

#[test]
fn test_provider_config_new_withGoogle_shouldUseGoogleDefaults() {
    let provider = ProviderConfig::new(TranslationProvider::Google);

    assert_eq!(provider.provider_type, "google");
    assert_eq!(provider.endpoint, "https://translate.googleapis.com");
    assert!(provider.model.is_empty());
}

#[test]
fn test_log_level_toLevelFilter_shouldMatchLogCrate() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
