/*!
 * Mock translator for testing and dry runs.
 *
 * This module provides a translator that never touches the network:
 * - `MockTranslator::identity()` - Returns the text unchanged
 * - `MockTranslator::prefixed()` - Returns `[target] text`
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::fail_on_call(n)` - Fails on the n-th call only (1-based)
 */

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::{ProviderError, TranslationError};
use crate::translation::Translator;

/// A recorded translate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Source language
    pub source_language: String,
    /// Target language
    pub target_language: String,
}

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns the input text unchanged
    Identity,
    /// Prefixes the text with the target language in brackets
    Prefixed,
    /// Always fails with an error
    Failing,
    /// Fails on the given call only (1-based), identity otherwise
    FailOnCall { call: usize },
    /// Identity, but earlier calls take longer than later ones
    Staggered { max_delay_ms: u64 },
}

/// Mock translator for testing translation behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate calls made so far
    call_count: AtomicUsize,
    /// Every request received, in call order
    requests: Mutex<Vec<MockRequest>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a translator that returns its input
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Create a translator that tags text with the target language
    pub fn prefixed() -> Self {
        Self::new(MockBehavior::Prefixed)
    }

    /// Create a failing translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a translator that fails on the n-th call (1-based)
    pub fn fail_on_call(call: usize) -> Self {
        Self::new(MockBehavior::FailOnCall { call })
    }

    /// Create a translator whose early calls finish last
    pub fn staggered(max_delay_ms: u64) -> Self {
        Self::new(MockBehavior::Staggered { max_delay_ms })
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn simulated_failure(call: usize) -> TranslationError {
        TranslationError::Provider(ProviderError::ConnectionError(format!(
            "Simulated failure on call {}",
            call
        )))
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(MockRequest {
                text: text.to_string(),
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
            });
        }

        match self.behavior {
            MockBehavior::Identity => Ok(text.to_string()),
            MockBehavior::Prefixed => Ok(format!("[{}] {}", target_language, text)),
            MockBehavior::Failing => Err(Self::simulated_failure(call)),
            MockBehavior::FailOnCall { call: failing_call } if call == failing_call => {
                Err(Self::simulated_failure(call))
            }
            MockBehavior::FailOnCall { .. } => Ok(text.to_string()),
            MockBehavior::Staggered { max_delay_ms } => {
                tokio::time::sleep(Duration::from_millis(max_delay_ms / call as u64)).await;
                Ok(text.to_string())
            }
        }
    }
}
