//! Verification verdicts.

use serde::{Deserialize, Serialize};

/// Outcome of one verification pass.
///
/// Persisted as `{ "passed": bool, "bug_report": text }`. Checkpoints written
/// by older tooling stored only the bug report string under `verify`; an
/// empty string there meant the solution passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredVerdict", into = "VerdictRecord")]
pub enum Verdict {
    /// The grader's report was classified as correct.
    Pass,
    /// The grader found problems; `bug_report` is the detailed log.
    Fail {
        /// Verification log following the "Detailed Verification" heading.
        bug_report: String,
    },
}

impl Verdict {
    /// Build a failing verdict.
    pub fn fail(bug_report: impl Into<String>) -> Self {
        Self::Fail {
            bug_report: bug_report.into(),
        }
    }

    /// True for [`Verdict::Pass`].
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Bug report text; empty on pass.
    pub fn bug_report(&self) -> &str {
        match self {
            Self::Pass => "",
            Self::Fail { bug_report } => bug_report,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VerdictRecord {
    passed: bool,
    #[serde(default)]
    bug_report: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredVerdict {
    Record(VerdictRecord),
    Legacy(String),
}

impl From<Verdict> for VerdictRecord {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => Self {
                passed: true,
                bug_report: String::new(),
            },
            Verdict::Fail { bug_report } => Self {
                passed: false,
                bug_report,
            },
        }
    }
}

impl From<StoredVerdict> for Verdict {
    fn from(stored: StoredVerdict) -> Self {
        match stored {
            StoredVerdict::Record(VerdictRecord { passed: true, .. }) => Self::Pass,
            StoredVerdict::Record(VerdictRecord { bug_report, .. }) => Self::Fail { bug_report },
            StoredVerdict::Legacy(report) if report.is_empty() => Self::Pass,
            StoredVerdict::Legacy(bug_report) => Self::Fail { bug_report },
        }
    }
}
