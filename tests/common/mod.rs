//! Common test utilities for integration tests
//!
//! Provides a scripted verifier and orchestrator builders shared across
//! the integration test files.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use proof_agent::domain::errors::EngineError;
use proof_agent::domain::models::{Solution, Verdict};
use proof_agent::infrastructure::engines::MockEngine;
use proof_agent::services::{
    CancellationFlag, ConvergenceOrchestrator, EngineCaller, SolutionVerifier,
    VerificationOutcome,
};

/// One scripted verification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Pass,
    Fail(&'static str),
    EngineDown,
}

impl Step {
    fn into_result(self) -> Result<Verdict, EngineError> {
        match self {
            Self::Pass => Ok(Verdict::Pass),
            Self::Fail(report) => Ok(Verdict::fail(report)),
            Self::EngineDown => Err(EngineError::Unavailable("verifier offline".to_string())),
        }
    }
}

/// Verifier that replays a fixed sequence, then repeats a fallback step.
pub struct ScriptedVerifier {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    seen: Mutex<Vec<(String, Solution)>>,
}

impl ScriptedVerifier {
    pub fn new(steps: impl IntoIterator<Item = Step>, fallback: Step) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            fallback,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn always(step: Step) -> Self {
        Self::new([], step)
    }

    /// Pass/fail sequence from booleans; `fallback` afterwards.
    pub fn from_bools(verdicts: &[bool], fallback: Step) -> Self {
        Self::new(
            verdicts
                .iter()
                .map(|&pass| if pass { Step::Pass } else { Step::Fail("gap") }),
            fallback,
        )
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// (problem statement, solution) for every call, in order.
    pub fn seen(&self) -> Vec<(String, Solution)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SolutionVerifier for ScriptedVerifier {
    async fn verify(
        &self,
        problem_statement: &str,
        solution: &Solution,
    ) -> Result<VerificationOutcome, EngineError> {
        self.seen
            .lock()
            .unwrap()
            .push((problem_statement.to_string(), solution.clone()));

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        let verdict = step.into_result()?;
        Ok(VerificationOutcome {
            report: verdict.bug_report().to_string(),
            classification: if verdict.passed() { "yes" } else { "no" }.to_string(),
            verdict,
        })
    }
}

/// Orchestrator over a mock engine and the given verifier.
pub fn orchestrator(
    engine: &MockEngine,
    verifier: &Arc<ScriptedVerifier>,
) -> ConvergenceOrchestrator {
    orchestrator_with_cancel(engine, verifier, CancellationFlag::new())
}

pub fn orchestrator_with_cancel(
    engine: &MockEngine,
    verifier: &Arc<ScriptedVerifier>,
    cancel: CancellationFlag,
) -> ConvergenceOrchestrator {
    let caller = EngineCaller::new(Arc::new(engine.clone())).with_cancellation(cancel);
    let verifier: Arc<dyn SolutionVerifier> = verifier.clone();
    ConvergenceOrchestrator::new(caller, verifier)
}

/// Write `content` to a fresh file inside `dir`.
pub fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}
