//! One bounded, cancellable round trip to the reasoning engine.
//!
//! Every call site in the pipeline goes through [`EngineCaller::ask`], which
//! checks the cancellation flag, applies the per-call timeout, and runs the
//! raw output through the response interpreter.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::errors::EngineError;
use crate::domain::models::Transcript;
use crate::domain::ports::ReasoningEngine;

use super::cancellation::CancellationFlag;
use super::response_interpreter::{interpret_with_source, Extraction};

/// Default wall-clock ceiling for a single call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(3600);

/// Shared entry point for engine calls.
#[derive(Clone)]
pub struct EngineCaller {
    engine: Arc<dyn ReasoningEngine>,
    timeout: Duration,
    cancel: CancellationFlag,
}

impl EngineCaller {
    pub fn new(engine: Arc<dyn ReasoningEngine>) -> Self {
        Self {
            engine,
            timeout: DEFAULT_CALL_TIMEOUT,
            cancel: CancellationFlag::new(),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn engine_id(&self) -> &str {
        self.engine.engine_id()
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancel
    }

    /// Send `transcript` and return the interpreted answer.
    ///
    /// # Errors
    /// - `EngineError::Cancelled` if shutdown was requested before the call
    /// - `EngineError::Timeout` if the engine overran the ceiling
    /// - any error the engine itself reports
    pub async fn ask(&self, transcript: &Transcript) -> Result<String, EngineError> {
        if self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        debug!(
            engine = self.engine.engine_id(),
            turns = transcript.len(),
            system_prompt_len = transcript.system_prompt().map_or(0, str::len),
            request_len = transcript.last_content().map_or(0, str::len),
            transcript = %serde_json::to_string(transcript).unwrap_or_default(),
            "Sending transcript to engine"
        );

        let raw = tokio::time::timeout(self.timeout, self.engine.complete(transcript))
            .await
            .map_err(|_| EngineError::Timeout(self.timeout.as_secs()))??;

        let (answer, source) = interpret_with_source(&raw);
        if source == Extraction::AnalysisChannel {
            warn!(
                engine = self.engine.engine_id(),
                "No final channel in response, using analysis channel"
            );
        }
        debug!(
            engine = self.engine.engine_id(),
            source = ?source,
            raw_len = raw.len(),
            answer_len = answer.len(),
            "Engine call complete"
        );
        Ok(answer)
    }
}
