//! Candidate solutions under refinement.

use serde::{Deserialize, Serialize};

/// Heading that opens the full proof inside a solution.
pub const DETAILED_SOLUTION_MARKER: &str = "Detailed Solution";

/// Candidate proof text produced by generation or correction.
///
/// Replaced wholesale on every correction; never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution(String);

impl Solution {
    /// Wrap engine output as a solution.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Full solution text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full proof following the "Detailed Solution" heading.
    ///
    /// Empty when the heading is missing, which leaves the grader nothing to
    /// accept.
    pub fn detailed_section(&self) -> &str {
        text_after_marker(&self.0, DETAILED_SOLUTION_MARKER)
    }
}

impl From<String> for Solution {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Trimmed text after the first occurrence of `marker`, or `""` if absent.
pub fn text_after_marker<'a>(text: &'a str, marker: &str) -> &'a str {
    text.find(marker)
        .map_or("", |idx| text[idx + marker.len()..].trim())
}
