//! Convergence policy, streak counters, and run phases.
//!
//! The verifier is itself a generative process, so one verdict proves little.
//! A run converges only after a streak of consecutive passes and gives up
//! after a streak of consecutive failures. Both thresholds and the iteration
//! ceiling live in [`ConvergencePolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::verdict::Verdict;

/// Thresholds that bound a single orchestrator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergencePolicy {
    /// Consecutive passing verdicts required to accept a solution.
    #[serde(default = "default_required_passes")]
    pub required_passes: u32,

    /// Consecutive failing verdicts after which the run gives up.
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// Verification iterations allowed before the run is declared failed.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

const fn default_required_passes() -> u32 {
    5
}

const fn default_max_consecutive_failures() -> u32 {
    10
}

const fn default_max_iterations() -> u32 {
    30
}

impl Default for ConvergencePolicy {
    fn default() -> Self {
        Self {
            required_passes: default_required_passes(),
            max_consecutive_failures: default_max_consecutive_failures(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl ConvergencePolicy {
    /// Decide what a run should do given its current streaks.
    pub const fn assess(&self, counters: &StreakCounters) -> Assessment {
        if counters.correct_count >= self.required_passes {
            Assessment::Converged
        } else if counters.error_count >= self.max_consecutive_failures {
            Assessment::GaveUp
        } else {
            Assessment::Continue
        }
    }
}

/// Result of applying the policy after a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    /// The pass streak reached the threshold.
    Converged,
    /// The failure streak reached the threshold.
    GaveUp,
    /// Keep iterating.
    Continue,
}

/// Consecutive pass/fail streaks. Held in memory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakCounters {
    /// Consecutive passing verifications.
    pub correct_count: u32,
    /// Consecutive failing verifications.
    pub error_count: u32,
}

impl StreakCounters {
    /// Fold one verdict in. Exactly one streak is reset per call.
    pub fn record(&mut self, verdict: &Verdict) {
        if verdict.passed() {
            self.correct_count += 1;
            self.error_count = 0;
        } else {
            self.correct_count = 0;
            self.error_count += 1;
        }
    }
}

/// States of the convergence state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Loading a checkpoint or starting fresh.
    Init,
    /// Producing the first candidate and its self-improvement.
    Generating,
    /// Grading the current candidate.
    Verifying,
    /// Rewriting the candidate against the latest bug report.
    Correcting,
    /// Terminal: the pass streak was reached.
    Converged,
    /// Terminal: the failure streak or the iteration ceiling was reached.
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::Generating => "GENERATING",
            Self::Verifying => "VERIFYING",
            Self::Correcting => "CORRECTING",
            Self::Converged => "CONVERGED",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_resets_opposite_streak() {
        let mut counters = StreakCounters::default();
        counters.record(&Verdict::Pass);
        counters.record(&Verdict::Pass);
        assert_eq!(counters.correct_count, 2);

        counters.record(&Verdict::fail("gap"));
        assert_eq!(counters, StreakCounters { correct_count: 0, error_count: 1 });

        counters.record(&Verdict::Pass);
        assert_eq!(counters, StreakCounters { correct_count: 1, error_count: 0 });
    }

    #[test]
    fn test_assess_thresholds() {
        let policy = ConvergencePolicy::default();
        let converged = StreakCounters { correct_count: 5, error_count: 0 };
        let gave_up = StreakCounters { correct_count: 0, error_count: 10 };
        let midway = StreakCounters { correct_count: 4, error_count: 0 };

        assert_eq!(policy.assess(&converged), Assessment::Converged);
        assert_eq!(policy.assess(&gave_up), Assessment::GaveUp);
        assert_eq!(policy.assess(&midway), Assessment::Continue);
    }

    #[test]
    fn test_phase_names() {
        assert_eq!(RunPhase::Init.to_string(), "INIT");
        assert_eq!(RunPhase::Verifying.to_string(), "VERIFYING");
    }
}
