//! proof-agent - convergence loop for long-form proof generation
//!
//! Drives a text-generation backend through a bounded, resumable
//! generate, verify, and correct cycle until a candidate proof survives a
//! streak of independent verifications, or reports failure.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): state model, convergence policy, port traits
//! - **Service Layer** (`services`): orchestrator, verifier, run driver
//! - **Infrastructure Layer** (`infrastructure`): engines, checkpoint stores,
//!   configuration, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use proof_agent::infrastructure::engines::MockEngine;
//! use proof_agent::services::{ConvergenceOrchestrator, EngineCaller, EngineVerifier};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let caller = EngineCaller::new(Arc::new(MockEngine::new()));
//! let verifier = Arc::new(EngineVerifier::new(caller.clone()));
//! let outcome = ConvergenceOrchestrator::new(caller, verifier)
//!     .run("Prove that there are infinitely many primes.", &[])
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{CheckpointError, EngineError, OrchestratorError};
pub use domain::models::{
    Config, ConvergencePolicy, OrchestratorState, Solution, Transcript, Verdict,
};
pub use domain::ports::{CheckpointStore, ReasoningEngine};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConvergenceOrchestrator, DriveOutcome, RunDriver, RunOutcome};
