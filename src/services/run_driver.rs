//! Outer loop over orchestrator runs.
//!
//! Each run is an independent attempt. Backend errors end the attempt, get
//! logged, and the driver moves on; cancellation ends the whole drive.

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::models::Solution;

use super::cancellation::CancellationFlag;
use super::orchestrator::{ConvergenceOrchestrator, RunOutcome};

/// Default number of whole-run attempts.
pub const DEFAULT_MAX_RUNS: u32 = 10;

/// How the drive ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveOutcome {
    /// A run converged.
    Solved {
        solution: Solution,
        run: u32,
        iterations: u32,
    },
    /// Every run ended without a solution.
    Exhausted { runs: u32 },
    /// Shutdown was requested; `runs` attempts were started.
    Cancelled { runs: u32 },
}

impl DriveOutcome {
    pub const fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Solved { solution, .. } => Some(solution),
            _ => None,
        }
    }
}

/// Re-invokes the orchestrator up to `max_runs` times.
pub struct RunDriver {
    orchestrator: ConvergenceOrchestrator,
    max_runs: u32,
    cancel: CancellationFlag,
}

impl RunDriver {
    pub fn new(orchestrator: ConvergenceOrchestrator, cancel: CancellationFlag) -> Self {
        Self {
            orchestrator,
            max_runs: DEFAULT_MAX_RUNS,
            cancel,
        }
    }

    #[must_use]
    pub const fn with_max_runs(mut self, max_runs: u32) -> Self {
        self.max_runs = max_runs;
        self
    }

    pub async fn drive(&self, problem_statement: &str, other_prompts: &[String]) -> DriveOutcome {
        for run in 1..=self.max_runs {
            if self.cancel.is_cancelled() {
                return self.cancelled(run - 1);
            }

            let run_id = Uuid::new_v4();
            info!("\n\n>>>>>>>>>>>>>>>>>>>>>>>>>> Run {run} of {} ...", self.max_runs);

            let result = self
                .orchestrator
                .run(problem_statement, other_prompts)
                .instrument(info_span!("run", %run_id, run))
                .await;

            match result {
                Ok(RunOutcome::Converged {
                    solution,
                    iterations,
                }) => {
                    info!(">>>>>>> Found a correct solution in run {run}.");
                    return DriveOutcome::Solved {
                        solution,
                        run,
                        iterations,
                    };
                }
                Ok(RunOutcome::Failed { reason, iterations }) => {
                    info!(
                        ?reason,
                        iterations, ">>>>>>> Failed in finding a correct solution in run {run}."
                    );
                }
                Err(e) if e.is_cancelled() => return self.cancelled(run),
                Err(e) => {
                    error!(%run_id, error = %e, ">>>>>>> Error in run {run}");
                }
            }
        }

        info!(">>>>>>> Failed to find a solution after {} runs.", self.max_runs);
        DriveOutcome::Exhausted {
            runs: self.max_runs,
        }
    }

    fn cancelled(&self, runs: u32) -> DriveOutcome {
        warn!(runs, "Shutdown requested, no further runs");
        DriveOutcome::Cancelled { runs }
    }
}
