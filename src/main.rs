//! proof-agent CLI entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, warn};

use proof_agent::cli::commands::{checkpoint, solve};
use proof_agent::cli::{report_error, Cli, Commands};
use proof_agent::infrastructure::config::ConfigLoader;
use proof_agent::infrastructure::logging::{LogConfig, LoggerImpl};
use proof_agent::services::{CancellationFlag, DriveOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Solve(args) => {
            solve::apply_overrides(&mut config, &args);
            ConfigLoader::validate(&config)?;
            let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

            let cancel = CancellationFlag::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, stopping after the current engine call");
                    on_interrupt.cancel();
                }
            });

            let outcome = solve::execute(&args, &config, cancel).await.inspect_err(|e| {
                error!(error = %e, "Solve failed");
            })?;

            Ok(match outcome {
                DriveOutcome::Solved { .. } => ExitCode::SUCCESS,
                DriveOutcome::Exhausted { .. } => ExitCode::FAILURE,
                DriveOutcome::Cancelled { .. } => ExitCode::from(130),
            })
        }
        Commands::Checkpoint(command) => {
            checkpoint::execute(command).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
