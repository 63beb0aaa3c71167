//! Convergence orchestrator.
//!
//! Drives one run attempt through the generate, verify, correct cycle:
//!
//! ```text
//! INIT -> GENERATING -> VERIFYING -> CONVERGED
//!                           |  ^  \-> FAILED
//!                           v  |
//!                        CORRECTING
//! ```
//!
//! A passing verdict short of the required streak re-verifies the same
//! solution; a failing one sends it to correction. Every completed
//! verification is checkpointed when a store is attached.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::{CheckpointError, OrchestratorError};
use crate::domain::models::{
    Assessment, ConvergencePolicy, OrchestratorState, RunPhase, Solution, StreakCounters,
    Transcript, Verdict,
};
use crate::domain::ports::CheckpointStore;

use super::engine_call::EngineCaller;
use super::prompts::{correction_request, SELF_IMPROVEMENT_PROMPT, SOLVER_SYSTEM_PROMPT};
use super::verifier::SolutionVerifier;

/// Why a run ended without a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The consecutive-failure streak reached its threshold.
    GaveUp,
    /// The verification budget ran out first.
    IterationCeiling,
}

/// Terminal result of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Converged {
        solution: Solution,
        iterations: u32,
    },
    Failed {
        reason: FailureReason,
        iterations: u32,
    },
}

impl RunOutcome {
    pub const fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Converged { solution, .. } => Some(solution),
            Self::Failed { .. } => None,
        }
    }

    pub const fn iterations(&self) -> u32 {
        match self {
            Self::Converged { iterations, .. } | Self::Failed { iterations, .. } => *iterations,
        }
    }
}

/// Where checkpoints go.
#[derive(Clone)]
struct CheckpointTarget {
    store: Arc<dyn CheckpointStore>,
    path: PathBuf,
}

/// Generate, verify, correct until the policy says stop.
#[derive(Clone)]
pub struct ConvergenceOrchestrator {
    caller: EngineCaller,
    verifier: Arc<dyn SolutionVerifier>,
    policy: ConvergencePolicy,
    checkpoint: Option<CheckpointTarget>,
    resume: bool,
}

impl ConvergenceOrchestrator {
    pub fn new(caller: EngineCaller, verifier: Arc<dyn SolutionVerifier>) -> Self {
        Self {
            caller,
            verifier,
            policy: ConvergencePolicy::default(),
            checkpoint: None,
            resume: false,
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: ConvergencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Checkpoint every verification to `path` in `store`.
    #[must_use]
    pub fn with_checkpoint(mut self, store: Arc<dyn CheckpointStore>, path: impl Into<PathBuf>) -> Self {
        self.checkpoint = Some(CheckpointTarget {
            store,
            path: path.into(),
        });
        self
    }

    /// Start from the checkpoint, when one exists.
    #[must_use]
    pub const fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    pub const fn policy(&self) -> &ConvergencePolicy {
        &self.policy
    }

    /// Run one attempt to completion.
    ///
    /// Returns `Ok` for both terminal states. Errors mean the attempt was
    /// aborted: an engine call failed or shutdown was requested.
    pub async fn run(
        &self,
        problem_statement: &str,
        other_prompts: &[String],
    ) -> Result<RunOutcome, OrchestratorError> {
        let mut state = self.initial_state(problem_statement, other_prompts).await;
        let mut counters = StreakCounters::default();

        let mut phase = RunPhase::Init;

        loop {
            self.ensure_not_cancelled()?;
            debug!(phase = %phase, iteration = state.iteration, "Orchestrator phase");

            phase = match phase {
                RunPhase::Init => phase_after_init(&state),
                RunPhase::Generating => {
                    let solution = self.generate(&state).await?;
                    state.solution = Some(solution);
                    RunPhase::Verifying
                }
                RunPhase::Verifying | RunPhase::Correcting
                    if state.iteration >= self.policy.max_iterations =>
                {
                    info!(
                        ">>>>>>> Iteration ceiling of {} reached without a correct solution.",
                        self.policy.max_iterations
                    );
                    return Ok(RunOutcome::Failed {
                        reason: FailureReason::IterationCeiling,
                        iterations: state.iteration,
                    });
                }
                RunPhase::Correcting => {
                    let solution = self.correct(&state).await?;
                    state.solution = Some(solution);
                    RunPhase::Verifying
                }
                RunPhase::Verifying => {
                    let verdict = self.verify(&state).await?;
                    state.iteration += 1;
                    counters.record(&verdict);
                    state.verdict = Some(verdict);
                    self.save_checkpoint(&state).await;

                    info!(
                        "Number of iterations: {}, number of corrects: {}, number of errors: {}",
                        state.iteration, counters.correct_count, counters.error_count
                    );

                    match self.policy.assess(&counters) {
                        Assessment::Converged => RunPhase::Converged,
                        Assessment::GaveUp => RunPhase::Failed,
                        Assessment::Continue if counters.correct_count > 0 => RunPhase::Verifying,
                        Assessment::Continue => RunPhase::Correcting,
                    }
                }
                RunPhase::Converged => {
                    info!(">>>>>>> Correct solution found.");
                    let solution = state.solution.unwrap_or_else(|| Solution::new(""));
                    return Ok(RunOutcome::Converged {
                        solution,
                        iterations: state.iteration,
                    });
                }
                RunPhase::Failed => {
                    info!(
                        ">>>>>>> Giving up after {} consecutive failed verifications.",
                        counters.error_count
                    );
                    return Ok(RunOutcome::Failed {
                        reason: FailureReason::GaveUp,
                        iterations: state.iteration,
                    });
                }
            };
        }
    }

    /// INIT: a resumed state when asked for and available, else a fresh one.
    /// Saved problem and prompts win over the supplied ones when present.
    async fn initial_state(
        &self,
        problem_statement: &str,
        other_prompts: &[String],
    ) -> OrchestratorState {
        let fresh = || OrchestratorState::new(problem_statement, other_prompts.to_vec());

        let Some(target) = self.checkpoint.as_ref().filter(|_| self.resume) else {
            return fresh();
        };

        match target.store.load(&target.path).await {
            Ok(checkpoint) => {
                info!(
                    ">>>>>>> Resuming from checkpoint {} at iteration {}",
                    target.path.display(),
                    checkpoint.state.iteration
                );
                checkpoint.state.resume(problem_statement, other_prompts)
            }
            Err(CheckpointError::NotFound(path)) => {
                info!(path = %path.display(), "No checkpoint to resume from, starting fresh");
                fresh()
            }
            Err(e) => {
                warn!(error = %e, "Could not load checkpoint, starting fresh");
                fresh()
            }
        }
    }

    fn opening(&self, state: &OrchestratorState) -> Transcript {
        Transcript::framed(
            SOLVER_SYSTEM_PROMPT,
            &state.problem_statement,
            &state.other_prompts,
        )
    }

    /// GENERATING: initial answer, then one self-improvement turn.
    async fn generate(&self, state: &OrchestratorState) -> Result<Solution, OrchestratorError> {
        let transcript = self.opening(state);
        let initial = self
            .caller
            .ask(&transcript)
            .await
            .map_err(OrchestratorError::Generation)?;
        info!(">>>>>>> Initial solution:\n{}", initial);

        info!(">>>>>>> Self improvement start:");
        let transcript = transcript
            .with_assistant(initial)
            .with_user(SELF_IMPROVEMENT_PROMPT);
        let improved = self
            .caller
            .ask(&transcript)
            .await
            .map_err(OrchestratorError::Generation)?;
        info!(">>>>>>> Corrected solution:\n{}", improved);

        Ok(Solution::from(improved))
    }

    /// CORRECTING: the opening plus only the latest solution and report.
    async fn correct(&self, state: &OrchestratorState) -> Result<Solution, OrchestratorError> {
        let previous = state.solution.as_ref().map_or("", Solution::as_str);
        let bug_report = state.verdict.as_ref().map_or("", Verdict::bug_report);

        info!(">>>>>>> Verification does not pass, correcting ...");
        let transcript = self
            .opening(state)
            .with_assistant(previous)
            .with_user(correction_request(bug_report));

        let corrected = self
            .caller
            .ask(&transcript)
            .await
            .map_err(|source| OrchestratorError::Correction {
                iteration: state.iteration,
                source,
            })?;
        info!(">>>>>>> Corrected solution:\n{}", corrected);

        Ok(Solution::from(corrected))
    }

    async fn verify(&self, state: &OrchestratorState) -> Result<Verdict, OrchestratorError> {
        let empty = Solution::new("");
        let solution = state.solution.as_ref().unwrap_or(&empty);

        info!(">>>>>>> Start verification.");
        let outcome = self
            .verifier
            .verify(&state.problem_statement, solution)
            .await
            .map_err(|source| OrchestratorError::Verification {
                iteration: state.iteration,
                source,
            })?;

        if let Verdict::Fail { bug_report } = &outcome.verdict {
            info!(">>>>>>> Verification results:\n{}", bug_report);
        }
        Ok(outcome.verdict)
    }

    async fn save_checkpoint(&self, state: &OrchestratorState) {
        let Some(target) = &self.checkpoint else {
            return;
        };
        match target.store.save(&target.path, state).await {
            Ok(()) => debug!(
                path = %target.path.display(),
                iteration = state.iteration,
                "Checkpoint saved"
            ),
            Err(e) => warn!(error = %e, "Failed to save checkpoint"),
        }
    }

    fn ensure_not_cancelled(&self) -> Result<(), OrchestratorError> {
        if self.caller.cancellation().is_cancelled() {
            Err(OrchestratorError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Phase after INIT: generate when there is no solution yet, otherwise
/// pick up where the saved verdict left off.
fn phase_after_init(state: &OrchestratorState) -> RunPhase {
    if !state.has_solution() {
        return RunPhase::Generating;
    }
    match state.verdict {
        Some(Verdict::Fail { .. }) => RunPhase::Correcting,
        _ => RunPhase::Verifying,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_follows_saved_solution_and_verdict() {
        let mut state = OrchestratorState::new("p", vec![]);
        assert_eq!(phase_after_init(&state), RunPhase::Generating);

        state.verdict = Some(Verdict::fail("gap"));
        assert_eq!(phase_after_init(&state), RunPhase::Generating);

        state.solution = Some(Solution::new("s"));
        assert_eq!(phase_after_init(&state), RunPhase::Correcting);

        state.verdict = Some(Verdict::Pass);
        assert_eq!(phase_after_init(&state), RunPhase::Verifying);

        state.verdict = None;
        assert_eq!(phase_after_init(&state), RunPhase::Verifying);
    }

    #[test]
    fn test_outcome_accessors() {
        let converged = RunOutcome::Converged {
            solution: Solution::new("s"),
            iterations: 5,
        };
        assert_eq!(converged.solution(), Some(&Solution::new("s")));
        assert_eq!(converged.iterations(), 5);

        let failed = RunOutcome::Failed {
            reason: FailureReason::GaveUp,
            iterations: 10,
        };
        assert!(failed.solution().is_none());
    }
}
