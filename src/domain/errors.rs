//! Domain errors for the proof agent.
//!
//! Three enums cover the three failure surfaces:
//! - `EngineError` - a single reasoning-engine round trip failed
//! - `CheckpointError` - persisting or loading orchestrator state failed
//! - `OrchestratorError` - a run attempt was aborted

use std::path::PathBuf;

use thiserror::Error;

/// Errors from one reasoning-engine call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine not configured: {0}")]
    NotConfigured(String),

    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Engine call exceeded {0}s")]
    Timeout(u64),

    #[error("Engine call cancelled")]
    Cancelled,

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Backend returned status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid engine response: {0}")]
    InvalidResponse(String),

    #[error("Engine process failed: {0}")]
    Process(String),
}

impl EngineError {
    /// Returns true if retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Errors from the checkpoint store.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Checkpoint not found at {0}")]
    NotFound(PathBuf),

    #[error("Checkpoint I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Checkpoint at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Checkpoint serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that abort a single orchestrator run attempt.
///
/// A failed verification verdict is *not* an error; it is ordinary control
/// flow counted by the orchestrator. These variants are the conditions the
/// run driver sees.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Initial generation failed: {0}")]
    Generation(#[source] EngineError),

    #[error("Correction at iteration {iteration} failed: {source}")]
    Correction {
        iteration: u32,
        #[source]
        source: EngineError,
    },

    #[error("Verification at iteration {iteration} failed: {source}")]
    Verification {
        iteration: u32,
        #[source]
        source: EngineError,
    },

    #[error("Run cancelled")]
    Cancelled,
}

impl OrchestratorError {
    /// Returns true when the attempt stopped because shutdown was requested.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Generation(source)
            | Self::Correction { source, .. }
            | Self::Verification { source, .. } => matches!(source, EngineError::Cancelled),
        }
    }
}
