//! Prompt texts for generation, correction, grading, and classification.
//!
//! The orchestrator treats these as opaque. Two pieces of their wording are
//! load-bearing: solutions must carry a "Detailed Solution" heading, and
//! grading reports must carry a "Detailed Verification" heading, because the
//! pipeline splits on both.

/// Heading that opens the step-by-step log inside a grading report.
pub const DETAILED_VERIFICATION_MARKER: &str = "Detailed Verification";

/// System prompt for generation and correction.
pub const SOLVER_SYSTEM_PROMPT: &str = r"
### Core Instructions ###

*   **Rigor first.** Produce a complete solution in which every step is logically sound and explicitly justified. A correct final answer reached through flawed or incomplete reasoning counts as a failure.
*   **Be honest about completeness.** If you cannot solve the problem completely, do not present guesses or arguments with hidden gaps. Present only significant partial results you can prove rigorously, such as a key lemma, a fully resolved case, a critical property of the objects involved, or one direction of a bound.
*   **Use TeX for all mathematics.** Enclose every variable, expression, and relation in TeX delimiters (e.g., `Let $n$ be an integer.`).

### Output Format ###

Structure your response into exactly these sections, in this order.

**1. Summary**

*   **a. Verdict:** State whether you found a complete or a partial solution. For a complete solution, state the final answer. For a partial solution, state the main conclusions you proved.
*   **b. Method Sketch:** A high-level outline of the argument: the overall strategy, precise statements of key lemmas, and any central constructions or case splits.

**2. Detailed Solution**

The full step-by-step proof. Every step must be justified in enough detail that an expert can verify it without filling gaps. Include only the final rigorous argument: no commentary, alternatives, or abandoned attempts.

### Self-Check ###

Before answering, reread your Method Sketch and Detailed Solution and make sure they are clean, rigorous, and follow every instruction above.
";

/// Second turn of initial generation.
pub const SELF_IMPROVEMENT_PROMPT: &str = r"
Review your solution carefully and improve it. Correct any errors and fill any justification gaps. Your revised answer must follow the instructions in the system prompt exactly.
";

/// Prefix of the correction request; the bug report follows it.
pub const CORRECTION_PROMPT: &str = r"
Below is a bug report on your solution. Where you agree with an item, revise the solution so that it is complete and rigorous. The grader may have misread your argument; where you disagree with an item, add explanation to the solution so the misunderstanding cannot recur. The new solution must follow the instructions in the system prompt exactly.
";

/// System prompt of the grading call.
pub const GRADER_SYSTEM_PROMPT: &str = r#"
You are an expert mathematician grading a competition-level proof. A solution is correct **only if every step is rigorously justified.** A correct final answer reached through flawed reasoning, guessing, or gaps must be reported as incorrect or incomplete.

### Instructions ###

**1. Core Instructions**
*   Your only task is to find and report every issue in the solution. You are a **verifier**, not a solver: do **not** fix errors or fill gaps.
*   Check the entire solution **step by step** and record the result in a **Detailed Verification Log**: a short justification for each correct step, a detailed explanation for each flawed one.

**2. Classifying Issues**
Every issue must be classified as exactly one of the following.

*   **a. Critical Error:** breaks the logical chain, either a logical fallacy or a factual/calculation error.
    *   Explain the error and state that it **invalidates the current line of reasoning**.
    *   Do not check later steps that depend on it.
    *   Do continue checking parts of the solution that are independent of it (for example, other cases of a case split).

*   **b. Justification Gap:** the conclusion may be true but the argument is incomplete or insufficiently rigorous.
    *   Explain the gap.
    *   **Assume the step's conclusion is true** and continue verifying the remaining steps.

**3. Output Format**
Your response has two sections: a **Summary** first, then the **Detailed Verification Log**.

*   **a. Summary**
    *   **Final Verdict:** one sentence on the overall validity, e.g. "The solution is correct" or "The solution contains a Critical Error and is therefore invalid."
    *   **List of Findings:** a bullet for **every** issue, giving its **Location** (a direct quote) and the **Issue** with its classification.

*   **b. Detailed Verification Log**
    The full step-by-step log. Quote the relevant text of the solution before analysing it.
"#;

/// Closing reminder appended to the grading request.
pub const GRADER_REMINDER: &str = r"
### Verification Task Reminder ###

Act as the grader described above. Produce the **Summary** and the **Detailed Verification Log** for the solution. Justify each correct step and explain every error or justification gap in detail.
";

/// Question put to the classification call, followed by the report.
pub const CLASSIFICATION_QUESTION: &str = r#"Respond with "yes" or "no". Does the following report say the solution is correct, or at least free of critical errors and major justification gaps?"#;

/// Build the grading request from the problem and the proof section.
pub fn grading_request(problem_statement: &str, detailed_solution: &str) -> String {
    format!(
        "
======================================================================
### Problem ###

{problem_statement}

======================================================================
### Solution ###

{detailed_solution}

{GRADER_REMINDER}
"
    )
}

/// Build the classification request around a grading report.
pub fn classification_request(report: &str) -> String {
    format!("{CLASSIFICATION_QUESTION}\n\n{report}")
}

/// Build the correction request around a bug report.
pub fn correction_request(bug_report: &str) -> String {
    format!("{CORRECTION_PROMPT}\n\n{bug_report}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::DETAILED_SOLUTION_MARKER;

    #[test]
    fn test_solver_prompt_names_split_heading() {
        assert!(SOLVER_SYSTEM_PROMPT.contains(DETAILED_SOLUTION_MARKER));
    }

    #[test]
    fn test_grader_prompt_names_split_heading() {
        assert!(GRADER_SYSTEM_PROMPT.contains(DETAILED_VERIFICATION_MARKER));
    }

    #[test]
    fn test_grader_prompt_keeps_quoted_verdict_examples() {
        assert!(GRADER_SYSTEM_PROMPT.contains("Final Verdict:"));
        assert!(GRADER_SYSTEM_PROMPT.contains(r#""The solution is correct""#));
        assert!(GRADER_SYSTEM_PROMPT.trim_end().ends_with("before analysing it."));
    }

    #[test]
    fn test_grading_request_contains_problem_and_proof() {
        let request = grading_request("Show 1+1=2.", "By Peano axioms.");
        assert!(request.contains("### Problem ###\n\nShow 1+1=2."));
        assert!(request.contains("### Solution ###\n\nBy Peano axioms."));
        assert!(request.contains("Verification Task Reminder"));
    }

    #[test]
    fn test_correction_request_appends_report() {
        let request = correction_request("gap");
        assert!(request.starts_with(CORRECTION_PROMPT));
        assert!(request.ends_with("\n\ngap"));
    }
}
