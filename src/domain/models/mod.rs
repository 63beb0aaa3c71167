//! Domain models for the proof agent.

pub mod config;
pub mod convergence;
pub mod solution;
pub mod state;
pub mod transcript;
pub mod verdict;

pub use config::{Config, ConvergenceConfig, EngineConfig, EngineKind, LoggingConfig};
pub use convergence::{Assessment, ConvergencePolicy, RunPhase, StreakCounters};
pub use solution::{text_after_marker, Solution, DETAILED_SOLUTION_MARKER};
pub use state::{Checkpoint, OrchestratorState, SavedState};
pub use transcript::{Role, Transcript, Turn};
pub use verdict::Verdict;
