//! Reasoning Engine Port
//!
//! The single point of contact with a text-generation backend. An engine
//! takes a transcript and returns the raw decoded text, markers and all;
//! turning that text into an answer is the response interpreter's job.
//!
//! Engines are constructed once at startup and injected wherever they are
//! needed. There is no lazily initialized global handle.

use async_trait::async_trait;

use crate::domain::errors::EngineError;
use crate::domain::models::Transcript;

/// Port trait for reasoning-engine backends
///
/// # Implementations
///
/// - **OpenAiCompatEngine**: HTTP `/chat/completions` (vLLM, Ollama, hosted APIs)
/// - **CommandEngine**: local process reading the transcript as JSON on stdin
/// - **MockEngine**: canned responses for dry runs and tests
///
/// # Concurrency
///
/// Backends are not assumed to tolerate overlapping calls. Implementations
/// serialize their own `complete` calls so that sharing one engine between
/// callers never puts two requests in flight on the same backend.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Short identifier, e.g. "openai-compat", "command", "mock".
    fn engine_id(&self) -> &str;

    /// Run one request/response round trip.
    ///
    /// # Errors
    /// - `EngineError::Unavailable` / `EngineError::Network` - backend unreachable
    /// - `EngineError::Http` - backend rejected the request
    /// - `EngineError::InvalidResponse` - backend answered with something unusable
    async fn complete(&self, transcript: &Transcript) -> Result<String, EngineError>;

    /// Check the backend is reachable before the first real call.
    async fn health_check(&self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Release backend resources. Called once on the way out.
    async fn shutdown(&self) {}
}
