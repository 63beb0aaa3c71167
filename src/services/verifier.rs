//! Two-step verification protocol.
//!
//! Grading asks the engine for a step-by-step report on the proof section of
//! a solution. Classification then asks a fresh yes/no question about that
//! report. The yes/no substring rule is confined to this module: everything
//! above it sees a [`Verdict`].

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::errors::EngineError;
use crate::domain::models::{text_after_marker, Solution, Transcript, Verdict};

use super::engine_call::EngineCaller;
use super::prompts::{
    classification_request, grading_request, DETAILED_VERIFICATION_MARKER, GRADER_SYSTEM_PROMPT,
};

/// Everything produced by one verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// Reconciled verdict.
    pub verdict: Verdict,
    /// Full grading report.
    pub report: String,
    /// Raw classification answer.
    pub classification: String,
}

/// Judges a candidate solution.
///
/// An `Err` means no verdict could be produced; it is never a failing
/// verdict in disguise.
#[async_trait]
pub trait SolutionVerifier: Send + Sync {
    async fn verify(
        &self,
        problem_statement: &str,
        solution: &Solution,
    ) -> Result<VerificationOutcome, EngineError>;
}

/// Verifier backed by two reasoning-engine calls.
#[derive(Clone)]
pub struct EngineVerifier {
    caller: EngineCaller,
}

impl EngineVerifier {
    pub const fn new(caller: EngineCaller) -> Self {
        Self { caller }
    }
}

#[async_trait]
impl SolutionVerifier for EngineVerifier {
    async fn verify(
        &self,
        problem_statement: &str,
        solution: &Solution,
    ) -> Result<VerificationOutcome, EngineError> {
        let grading = Transcript::framed(
            GRADER_SYSTEM_PROMPT,
            &grading_request(problem_statement, solution.detailed_section()),
            &[],
        );
        let report = self.caller.ask(&grading).await?;
        debug!(report = %report, "Grading report");

        let classification_turns = Transcript::framed("", &classification_request(&report), &[]);
        let classification = self.caller.ask(&classification_turns).await?;
        info!(">>>>>>> Is verification good?\n{}", classification);

        let verdict = reconcile(&classification, &report);
        debug!(passed = verdict.passed(), "Verification reconciled");

        Ok(VerificationOutcome {
            verdict,
            report,
            classification,
        })
    }
}

/// Map a classification answer and its report onto a verdict.
///
/// Passes when the answer contains "yes" in any case. A failing verdict
/// carries the report body below the "Detailed Verification" heading.
pub fn reconcile(classification: &str, report: &str) -> Verdict {
    if classification.to_lowercase().contains("yes") {
        Verdict::Pass
    } else {
        Verdict::fail(log_body(report))
    }
}

/// Text after the heading, minus the rest of the heading line.
fn log_body(report: &str) -> &str {
    let rest = text_after_marker(report, DETAILED_VERIFICATION_MARKER);
    rest.split_once('\n').map_or(rest, |(_, body)| body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "**Summary**\nInvalid.\n\n**Detailed Verification Log**\n\nStep 2 divides by zero.";

    #[test]
    fn test_yes_in_any_case_passes() {
        assert_eq!(reconcile("Yes.", REPORT), Verdict::Pass);
        assert_eq!(reconcile("YES", REPORT), Verdict::Pass);
    }

    #[test]
    fn test_substring_rule_is_literal() {
        // "eyes" contains "yes"; the rule is a substring test, not a word test.
        assert_eq!(reconcile("my eyes hurt", REPORT), Verdict::Pass);
    }

    #[test]
    fn test_no_yields_report_after_heading() {
        let verdict = reconcile("no", REPORT);
        assert_eq!(verdict.bug_report(), "Step 2 divides by zero.");
    }

    #[test]
    fn test_heading_without_body_line_keeps_remainder() {
        let verdict = reconcile("no", "Detailed Verification: step 2 is wrong");
        assert_eq!(verdict.bug_report(), ": step 2 is wrong");
    }

    #[test]
    fn test_no_without_heading_yields_empty_report() {
        assert_eq!(reconcile("no", "bad proof"), Verdict::fail(""));
    }
}
