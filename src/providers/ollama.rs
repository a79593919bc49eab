use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, map_request_error, map_status_error, with_retry};

/// Client for a local Ollama server, used as an LLM translator
#[derive(Debug)]
pub struct Ollama {
    // Without trailing slash
    base_url: String,
    client: Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    /// Caption text to translate
    pub prompt: String,
    /// Translation instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerationOptions>,
    /// Always `false`: a caption is short enough to wait for the whole answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Sampling options forwarded to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Lower values keep translations literal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Non-streaming answer of `/api/generate`
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub model: String,
    #[serde(default)]
    pub created_at: String,
    /// The translation, possibly wrapped in whitespace
    pub response: String,
    /// Set on the last chunk of a stream
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Non-streaming request without system prompt or options
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Attach translation instructions
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Override sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

impl Ollama {
    /// Client for the server at `endpoint`.
    ///
    /// Ollama speaks HTTP/1.1 only. Connections stay open between captions.
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64, max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            base_url: endpoint.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Run one generation, retrying transient failures
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        with_retry("Ollama", self.max_retries, self.backoff_base_ms, || self.generate_once(&url, request)).await
    }

    async fn generate_once(&self, url: &str, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let response = self.client.post(url)
            .json(request)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(map_request_error)?;
        if !status.is_success() {
            error!("Ollama API error ({}): {}", status, response_text);
            return Err(map_status_error(status, response_text));
        }

        Self::parse_generation_response(&response_text)
    }

    /// Parse a generate response.
    ///
    /// A server that ignores `stream: false` answers with one JSON object
    /// per line; the pieces of `response` are concatenated in that case.
    pub fn parse_generation_response(response_text: &str) -> Result<GenerationResponse, ProviderError> {
        if let Ok(response) = serde_json::from_str::<GenerationResponse>(response_text) {
            return Ok(response);
        }

        let objects: Vec<Value> = response_text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .collect();

        let Some(last) = objects.last() else {
            let preview: String = response_text.chars().take(500).collect();
            error!("Failed to parse Ollama API response. Raw response (first 500 chars): {}", preview);
            return Err(ProviderError::ParseError(
                "Ollama API response contains invalid JSON".to_string(),
            ));
        };

        let full_response: String = objects
            .iter()
            .filter_map(|obj| obj.get("response").and_then(Value::as_str))
            .collect();

        Ok(GenerationResponse {
            model: last.get("model").and_then(Value::as_str).unwrap_or("unknown").to_string(),
            created_at: last.get("created_at").and_then(Value::as_str).unwrap_or("").to_string(),
            response: full_response,
            done: last.get("done").and_then(Value::as_bool).unwrap_or(true),
            prompt_eval_count: last.get("prompt_eval_count").and_then(Value::as_u64),
            eval_count: last.get("eval_count").and_then(Value::as_u64),
        })
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.generate(&request).await
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.trim().to_string()
    }
}
