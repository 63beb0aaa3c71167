//! `solve` command: wire the pipeline together and drive it.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::types::SolveArgs;
use crate::domain::models::{Config, EngineKind};
use crate::domain::ports::ReasoningEngine;
use crate::infrastructure::checkpoint::JsonFileStore;
use crate::infrastructure::engines::build_engine;
use crate::services::{
    CancellationFlag, ConvergenceOrchestrator, DriveOutcome, EngineCaller, EngineVerifier,
    RunDriver,
};

/// Fold command-line flags into the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &SolveArgs) {
    if let Some(log) = &args.log {
        config.logging.file = Some(log.clone());
    }
    if let Some(max_runs) = args.max_runs {
        config.convergence.max_runs = max_runs;
    }
    if args.dry_run {
        config.engine.kind = EngineKind::Mock;
    }
}

/// Read the problem statement. Nothing touches a backend before this
/// succeeds.
pub async fn read_problem(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read problem file {}", path.display()))
}

/// Run the solve loop. `config` must already carry the CLI overrides.
pub async fn execute(args: &SolveArgs, config: &Config, cancel: CancellationFlag) -> Result<DriveOutcome> {
    let problem_statement = read_problem(&args.problem_file).await?;

    let engine = build_engine(&config.engine).context("Failed to construct reasoning engine")?;
    if let Err(e) = engine.health_check().await {
        warn!(engine = engine.engine_id(), error = %e, "Engine health check failed");
    }

    let driver = build_driver(Arc::clone(&engine), args, config, cancel);

    info!(
        engine = engine.engine_id(),
        max_runs = config.convergence.max_runs,
        resume = args.resume,
        "Starting proof search"
    );
    let outcome = driver.drive(&problem_statement, &args.other_prompts).await;

    if let DriveOutcome::Solved { solution, .. } = &outcome {
        info!(">>>>>>> Final solution:\n{}", solution.as_str());
    }

    engine.shutdown().await;
    Ok(outcome)
}

/// Assemble caller, verifier, orchestrator, and driver around `engine`.
pub fn build_driver(
    engine: Arc<dyn ReasoningEngine>,
    args: &SolveArgs,
    config: &Config,
    cancel: CancellationFlag,
) -> RunDriver {
    let caller = EngineCaller::new(engine)
        .with_timeout(Duration::from_secs(config.engine.call_timeout_secs))
        .with_cancellation(cancel.clone());
    let verifier = Arc::new(EngineVerifier::new(caller.clone()));

    let policy = config.convergence.policy();
    let mut orchestrator = ConvergenceOrchestrator::new(caller, verifier)
        .with_policy(policy)
        .with_resume(args.resume);

    if let Some(memory) = &args.memory {
        let store = JsonFileStore::new().with_iteration_ceiling(policy.max_iterations);
        orchestrator = orchestrator.with_checkpoint(Arc::new(store), memory.clone());
    }

    RunDriver::new(orchestrator, cancel).with_max_runs(config.convergence.max_runs)
}
