//! Services: the convergence pipeline built on the domain ports.

pub mod cancellation;
pub mod engine_call;
pub mod orchestrator;
pub mod prompts;
pub mod response_interpreter;
pub mod run_driver;
pub mod verifier;

pub use cancellation::CancellationFlag;
pub use engine_call::EngineCaller;
pub use orchestrator::{ConvergenceOrchestrator, FailureReason, RunOutcome};
pub use response_interpreter::{interpret, interpret_with_source, Extraction};
pub use run_driver::{DriveOutcome, RunDriver};
pub use verifier::{EngineVerifier, SolutionVerifier, VerificationOutcome};
