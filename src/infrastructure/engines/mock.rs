//! Mock engine for dry runs and tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::EngineError;
use crate::domain::models::Transcript;
use crate::domain::ports::ReasoningEngine;

/// Text the mock returns when nothing is queued. It carries a proof section
/// heading and answers "yes" to classification, so an unscripted run
/// converges.
pub const DRY_RUN_RESPONSE: &str = "**1. Summary**\n\nyes: dry run, no engine was contacted.\n\n\
**2. Detailed Solution**\n\nDry run placeholder.";

/// Mock response configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Return this text.
    Text(String),
    /// Fail with `EngineError::Unavailable`.
    Failure(String),
}

impl MockResponse {
    pub fn success(output: impl Into<String>) -> Self {
        Self::Text(output.into())
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(error.into())
    }
}

/// Mock engine: pops scripted responses in order, then repeats a default.
#[derive(Clone)]
pub struct MockEngine {
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    default_response: MockResponse,
    transcripts: Arc<Mutex<Vec<Transcript>>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::with_default_response(MockResponse::success(DRY_RUN_RESPONSE))
    }

    pub fn with_default_response(response: MockResponse) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            default_response: response,
            transcripts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue responses to be returned before the default.
    pub fn scripted(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into_iter().collect())),
            ..Self::new()
        }
    }

    pub async fn push(&self, response: MockResponse) {
        self.script.lock().await.push_back(response);
    }

    /// Every transcript received, in call order.
    pub async fn transcripts(&self) -> Vec<Transcript> {
        self.transcripts.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.transcripts.lock().await.len()
    }
}

#[async_trait]
impl ReasoningEngine for MockEngine {
    fn engine_id(&self) -> &str {
        "mock"
    }

    async fn complete(&self, transcript: &Transcript) -> Result<String, EngineError> {
        self.transcripts.lock().await.push(transcript.clone());

        let response = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_response.clone());

        match response {
            MockResponse::Text(text) => Ok(text),
            MockResponse::Failure(message) => Err(EngineError::Unavailable(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_default() {
        let engine = MockEngine::scripted([
            MockResponse::success("first"),
            MockResponse::failure("down"),
        ]);
        let transcript = Transcript::framed("s", "q", &[]);

        assert_eq!(engine.complete(&transcript).await.unwrap(), "first");
        assert!(matches!(
            engine.complete(&transcript).await,
            Err(EngineError::Unavailable(_))
        ));
        assert_eq!(engine.complete(&transcript).await.unwrap(), DRY_RUN_RESPONSE);
        assert_eq!(engine.call_count().await, 3);
    }

    #[test]
    fn test_dry_run_response_converges() {
        assert!(DRY_RUN_RESPONSE.contains("Detailed Solution"));
        assert!(DRY_RUN_RESPONSE.to_lowercase().contains("yes"));
    }
}
