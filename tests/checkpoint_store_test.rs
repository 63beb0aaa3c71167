//! Integration tests for checkpoint persistence.

mod common;

use std::sync::Arc;

use common::{orchestrator, write_file, ScriptedVerifier, Step};
use proof_agent::domain::errors::CheckpointError;
use proof_agent::domain::models::{OrchestratorState, SavedState, Solution, Verdict};
use proof_agent::domain::ports::CheckpointStore;
use proof_agent::infrastructure::checkpoint::JsonFileStore;
use proof_agent::infrastructure::engines::MockEngine;
use proof_agent::services::RunOutcome;
use proptest::prelude::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_fresh_state_round_trips_with_null_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    let store = JsonFileStore::new();
    let state = OrchestratorState::new("Prove it.", vec![]);

    store.save(&path, &state).await.unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw["solution"].is_null());
    assert!(raw["verdict"].is_null());
    assert!(raw["timestamp"].is_string());

    let loaded = store.load(&path).await.unwrap();
    assert_eq!(loaded.state, SavedState::from(state.clone()));
    assert_eq!(loaded.state.clone().resume("other", &[]), state);
    assert_eq!(loaded.max_iterations, None);
    assert!(loaded.saved_at().is_some());
}

#[tokio::test]
async fn test_loads_documents_with_legacy_field_names() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "legacy.json",
        r#"{
            "problem_statement": "Show that 2 + 2 = 4.",
            "other_prompts": [],
            "current_iteration": 4,
            "max_runs": 30,
            "solution": "**Detailed Solution** arithmetic",
            "verify": "Step 2 skips a case.",
            "timestamp": "2025-01-02T03:04:05.000006"
        }"#,
    );

    let checkpoint = JsonFileStore::new().load(&path).await.unwrap();

    assert_eq!(checkpoint.state.iteration, 4);
    assert_eq!(checkpoint.max_iterations, Some(30));
    assert_eq!(
        checkpoint.state.solution,
        Some(Solution::new("**Detailed Solution** arithmetic"))
    );
    assert_eq!(
        checkpoint.state.verdict,
        Some(Verdict::fail("Step 2 skips a case."))
    );
    // Naive timestamps are kept verbatim but carry no offset.
    assert_eq!(
        checkpoint.timestamp.as_deref(),
        Some("2025-01-02T03:04:05.000006")
    );
}

#[tokio::test]
async fn test_document_without_problem_still_loads() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "partial.json",
        r#"{ "current_iteration": 7, "solution": "kept" }"#,
    );

    let checkpoint = JsonFileStore::new().load(&path).await.unwrap();

    assert_eq!(checkpoint.state.problem_statement, None);
    assert_eq!(checkpoint.state.other_prompts, None);
    let state = checkpoint.state.resume("fresh", &["hint".to_string()]);
    assert_eq!(state.problem_statement, "fresh");
    assert_eq!(state.other_prompts, vec!["hint".to_string()]);
    assert_eq!(state.iteration, 7);
    assert_eq!(state.solution, Some(Solution::new("kept")));
}

#[tokio::test]
async fn test_missing_and_malformed_files_are_distinguished() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new();

    let missing = store.load(&dir.path().join("absent.json")).await;
    assert!(matches!(missing, Err(CheckpointError::NotFound(_))));

    let garbage = write_file(&dir, "garbage.json", "{ not json");
    let malformed = store.load(&garbage).await;
    assert!(matches!(malformed, Err(CheckpointError::Malformed { .. })));
}

#[tokio::test]
async fn test_orchestrator_writes_latest_state_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("runs").join("memory.json");
    let store = Arc::new(JsonFileStore::new().with_iteration_ceiling(30));

    let engine = MockEngine::new();
    let verifier = Arc::new(ScriptedVerifier::from_bools(&[false], Step::Pass));

    let outcome = orchestrator(&engine, &verifier)
        .with_checkpoint(store.clone(), &path)
        .run("Prove it.", &[])
        .await
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Converged { iterations: 6, .. }));

    let checkpoint = store.load(&path).await.unwrap();
    assert_eq!(checkpoint.state.iteration, 6);
    assert_eq!(checkpoint.state.verdict, Some(Verdict::Pass));
    assert_eq!(checkpoint.max_iterations, Some(30));

    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn test_save_failure_does_not_abort_the_run() {
    let dir = TempDir::new().unwrap();
    // A directory where the checkpoint file should be makes every save fail.
    let path = dir.path().join("memory.json");
    std::fs::create_dir(&path).unwrap();

    let engine = MockEngine::new();
    let verifier = Arc::new(ScriptedVerifier::always(Step::Pass));

    let outcome = orchestrator(&engine, &verifier)
        .with_checkpoint(Arc::new(JsonFileStore::new()), &path)
        .run("Prove it.", &[])
        .await
        .unwrap();

    assert_eq!(outcome.iterations(), 5);
    assert!(path.is_dir());
}

fn verdict_strategy() -> impl Strategy<Value = Option<Verdict>> {
    prop_oneof![
        Just(None),
        Just(Some(Verdict::Pass)),
        Just(Some(Verdict::fail(""))),
        any::<String>().prop_map(|report| Some(Verdict::fail(report))),
    ]
}

fn state_strategy() -> impl Strategy<Value = OrchestratorState> {
    (
        any::<String>(),
        prop::collection::vec(any::<String>(), 0..4),
        any::<u32>(),
        prop::option::of(any::<String>()),
        verdict_strategy(),
    )
        .prop_map(|(problem, prompts, iteration, solution, verdict)| {
            let mut state = OrchestratorState::new(problem, prompts);
            state.iteration = iteration;
            state.solution = solution.map(Solution::new);
            state.verdict = verdict;
            state
        })
}

proptest! {
    /// Property: loading a saved state yields the same state.
    #[test]
    fn prop_saved_state_loads_back_unchanged(state in state_strategy()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let loaded = runtime.block_on(async {
            let store = JsonFileStore::new();
            store.save(&path, &state).await.unwrap();
            store.load(&path).await.unwrap()
        });

        prop_assert_eq!(loaded.state.resume("", &[]), state);
    }
}
