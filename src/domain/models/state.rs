//! Orchestrator state, the unit of persistence.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::solution::Solution;
use super::verdict::Verdict;

/// Everything needed to resume a run.
///
/// `solution == None` means initial generation never completed. `iteration`
/// counts verifications completed in the run and never decreases between
/// checkpoints of the same run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrchestratorState {
    /// The task being solved.
    pub problem_statement: String,

    /// Extra user turns appended after the question.
    pub other_prompts: Vec<String>,

    /// Verifications completed so far.
    pub iteration: u32,

    /// Latest candidate solution.
    pub solution: Option<Solution>,

    /// Verdict on `solution`.
    pub verdict: Option<Verdict>,
}

impl OrchestratorState {
    /// Fresh state before any generation.
    pub fn new(problem_statement: impl Into<String>, other_prompts: Vec<String>) -> Self {
        Self {
            problem_statement: problem_statement.into(),
            other_prompts,
            iteration: 0,
            solution: None,
            verdict: None,
        }
    }

    /// True once initial generation has produced a candidate.
    pub const fn has_solution(&self) -> bool {
        self.solution.is_some()
    }
}

/// A state as read back from a checkpoint store.
///
/// Older checkpoints may lack the problem or the prompts; those fields stay
/// `None` so the caller's values can fill them in on resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub problem_statement: Option<String>,

    #[serde(default)]
    pub other_prompts: Option<Vec<String>>,

    #[serde(default, alias = "current_iteration")]
    pub iteration: u32,

    #[serde(default)]
    pub solution: Option<Solution>,

    #[serde(default, alias = "verify")]
    pub verdict: Option<Verdict>,
}

impl SavedState {
    /// Merge into a live state. Saved fields win where present; the
    /// supplied problem and prompts cover the ones that are missing.
    pub fn resume(self, problem_statement: &str, other_prompts: &[String]) -> OrchestratorState {
        OrchestratorState {
            problem_statement: self
                .problem_statement
                .unwrap_or_else(|| problem_statement.to_string()),
            other_prompts: self
                .other_prompts
                .unwrap_or_else(|| other_prompts.to_vec()),
            iteration: self.iteration,
            solution: self.solution,
            verdict: self.verdict,
        }
    }
}

impl From<OrchestratorState> for SavedState {
    fn from(state: OrchestratorState) -> Self {
        Self {
            problem_statement: Some(state.problem_statement),
            other_prompts: Some(state.other_prompts),
            iteration: state.iteration,
            solution: state.solution,
            verdict: state.verdict,
        }
    }
}

/// A checkpoint as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// The persisted state.
    pub state: SavedState,
    /// Iteration ceiling in force when the state was saved, if recorded.
    pub max_iterations: Option<u32>,
    /// Raw save timestamp as written.
    pub timestamp: Option<String>,
}

impl Checkpoint {
    /// Parsed save time, when the timestamp carries an offset.
    pub fn saved_at(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_has_no_solution() {
        let state = OrchestratorState::new("prove 1+1=2", vec![]);
        assert!(!state.has_solution());
        assert_eq!(state.iteration, 0);
        assert!(state.verdict.is_none());
    }

    #[test]
    fn test_legacy_field_names_load() {
        let json = r#"{
            "problem_statement": "p",
            "other_prompts": ["x"],
            "current_iteration": 4,
            "max_runs": 30,
            "solution": "s",
            "verify": "bad step",
            "timestamp": "2025-07-20T10:00:00"
        }"#;
        let state: SavedState = serde_json::from_str(json).unwrap();
        assert_eq!(state.iteration, 4);
        assert_eq!(state.solution, Some(Solution::new("s")));
        assert_eq!(state.verdict, Some(Verdict::fail("bad step")));
    }

    #[test]
    fn test_null_solution_and_verdict() {
        let json = r#"{"problem_statement": "p", "iteration": 0, "solution": null, "verdict": null}"#;
        let state: SavedState = serde_json::from_str(json).unwrap();
        assert_eq!(state.resume("ignored", &[]), OrchestratorState::new("p", vec![]));
    }

    #[test]
    fn test_resume_fills_missing_fields_from_caller() {
        let json = r#"{"current_iteration": 7, "solution": "old"}"#;
        let saved: SavedState = serde_json::from_str(json).unwrap();
        let prompts = vec!["hint".to_string()];

        let state = saved.resume("fresh", &prompts);

        assert_eq!(state.problem_statement, "fresh");
        assert_eq!(state.other_prompts, prompts);
        assert_eq!(state.iteration, 7);
        assert_eq!(state.solution, Some(Solution::new("old")));
    }

    #[test]
    fn test_resume_prefers_saved_fields() {
        let saved = SavedState::from(OrchestratorState::new("saved", vec![]));
        let state = saved.resume("fresh", &["hint".to_string()]);
        assert_eq!(state.problem_statement, "saved");
        assert!(state.other_prompts.is_empty(), "an explicit empty list is kept");
    }

    #[test]
    fn test_saved_at_parses_rfc3339_only() {
        let mut checkpoint = Checkpoint {
            state: SavedState::default(),
            max_iterations: Some(30),
            timestamp: Some("2026-01-02T03:04:05+00:00".to_string()),
        };
        assert!(checkpoint.saved_at().is_some());

        checkpoint.timestamp = Some("2025-07-20T10:00:00".to_string());
        assert!(checkpoint.saved_at().is_none());
    }
}
