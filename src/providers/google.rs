use async_trait::async_trait;
use log::trace;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Provider, map_request_error, map_status_error, with_retry};

/// Client for the public Google Translate web endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// Base URL, e.g. `https://translate.googleapis.com`
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Translation request
#[derive(Debug, Clone)]
pub struct GoogleRequest {
    /// Text to translate
    pub text: String,
    /// ISO 639-1 code or `auto`
    pub source_language: String,
    /// ISO 639-1 code
    pub target_language: String,
}

impl GoogleRequest {
    pub fn new(text: impl Into<String>, source_language: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Translation response
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleResponse {
    /// Translated sentences, in order
    pub segments: Vec<String>,
    /// Source language reported by the service
    pub detected_language: Option<String>,
}

impl GoogleTranslate {
    /// Create a client for the given endpoint
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64, max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            base_url: endpoint.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Build the request URL for a translation
    pub fn build_url(&self, request: &GoogleRequest) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &format!("{}/translate_a/single", self.base_url),
            &[
                ("client", "gtx"),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid Google Translate URL: {}", e)))
    }

    /// Parse the nested-array response body.
    ///
    /// The body looks like `[[["Hallo","Hello",null,null,10], ...], null, "en", ...]`:
    /// element 0 holds one entry per sentence with the translation first,
    /// element 2 holds the detected source language.
    pub fn parse_response(body: &str) -> Result<GoogleResponse, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Google Translate returned invalid JSON: {}", e)))?;

        let root = value
            .as_array()
            .ok_or_else(|| ProviderError::ParseError("Google Translate response is not an array".to_string()))?;

        let segments = match root.first() {
            Some(Value::Array(sentences)) => sentences
                .iter()
                .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
                .map(str::to_string)
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ProviderError::ParseError(format!(
                    "Unexpected sentence list in Google Translate response: {}",
                    other
                )));
            }
        };

        let detected_language = root.get(2).and_then(Value::as_str).map(str::to_string);

        Ok(GoogleResponse {
            segments,
            detected_language,
        })
    }

    async fn send_once(&self, url: &Url) -> Result<GoogleResponse, ProviderError> {
        let response = self.client.get(url.clone()).send().await.map_err(map_request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_request_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body));
        }

        Self::parse_response(&body)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    type Request = GoogleRequest;
    type Response = GoogleResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = self.build_url(&request)?;
        trace!("Google Translate request: {} -> {}", request.source_language, request.target_language);

        with_retry("Google Translate", self.max_retries, self.backoff_base_ms, || self.send_once(&url)).await
    }

    fn extract_text(response: &Self::Response) -> String {
        response.segments.concat()
    }
}
