/*!
 * Clients for the translation backends.
 *
 * - `google`: the public Google Translate web endpoint
 * - `ollama`: a local LLM server
 * - `mock`: a deterministic translator for tests and dry runs
 *
 * Retrying transient failures is the job of each client, see `with_retry`.
 */

use async_trait::async_trait;
use log::warn;
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use crate::errors::ProviderError;

/// A remote backend speaking its own request/response types
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    type Request: Send + Sync;
    type Response: Send + Sync;

    /// Send one request, retries included
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Translated text carried by a response
    fn extract_text(response: &Self::Response) -> String;
}

/// Map a transport failure from reqwest onto a provider error
pub(crate) fn map_request_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() || error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

/// Map a non-success HTTP status onto a provider error
pub(crate) fn map_status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimitExceeded(body)
    } else {
        ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        }
    }
}

/// Run a request, retrying retryable failures with exponential backoff.
///
/// The wait before retry `n` is `backoff_base_ms * 2^(n-1)`.
pub(crate) async fn with_retry<T, F, Fut>(
    provider_name: &str,
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                warn!("{} request failed: {} - attempt {}/{}", provider_name, e, attempt, max_retries + 1);
                let backoff_ms = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

pub mod google;
pub mod mock;
pub mod ollama;
