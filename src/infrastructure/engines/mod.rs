//! Reasoning engine adapters
//!
//! - `openai_compat` - HTTP chat completions with retry
//! - `command` - local process over stdin/stdout
//! - `mock` - scripted responses

pub mod command;
pub mod mock;
pub mod openai_compat;
pub mod retry;

use std::sync::Arc;

use crate::domain::errors::EngineError;
use crate::domain::models::{EngineConfig, EngineKind};
use crate::domain::ports::ReasoningEngine;

pub use command::CommandEngine;
pub use mock::{MockEngine, MockResponse, DRY_RUN_RESPONSE};
pub use openai_compat::OpenAiCompatEngine;
pub use retry::RetryPolicy;

/// Construct the engine selected by `config.kind`
pub fn build_engine(config: &EngineConfig) -> Result<Arc<dyn ReasoningEngine>, EngineError> {
    let engine: Arc<dyn ReasoningEngine> = match config.kind {
        EngineKind::OpenAiCompat => Arc::new(OpenAiCompatEngine::from_config(config)?),
        EngineKind::Command => Arc::new(CommandEngine::from_config(config)?),
        EngineKind::Mock => Arc::new(MockEngine::new()),
    };
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_engine_by_kind() {
        let mut config = EngineConfig {
            kind: EngineKind::Mock,
            ..EngineConfig::default()
        };
        assert_eq!(build_engine(&config).unwrap().engine_id(), "mock");

        config.kind = EngineKind::OpenAiCompat;
        assert_eq!(build_engine(&config).unwrap().engine_id(), "openai-compat");

        config.kind = EngineKind::Command;
        config.command = Some("model-server".to_string());
        assert_eq!(build_engine(&config).unwrap().engine_id(), "command");
    }
}
