//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "proof-agent")]
#[command(about = "Solve, verify, and correct long-form proofs until they converge", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to .proof-agent/config.yaml)
    #[arg(long, global = true, env = "PROOF_AGENT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the solve/verify/correct loop on a problem file
    Solve(SolveArgs),

    /// Inspect checkpoint files
    #[command(subcommand)]
    Checkpoint(CheckpointCommands),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SolveArgs {
    /// Text file holding the problem statement
    pub problem_file: PathBuf,

    /// Append every log line to this file
    #[arg(short = 'l', long = "log")]
    pub log: Option<PathBuf>,

    /// Extra prompts appended after the problem (comma-separated)
    #[arg(
        short = 'o',
        long = "other-prompts",
        alias = "other_prompts",
        value_delimiter = ','
    )]
    pub other_prompts: Vec<String>,

    /// Maximum number of whole-run attempts
    #[arg(
        short = 'm',
        long = "max-runs",
        alias = "max_runs",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_runs: Option<u32>,

    /// Checkpoint file written after every verification
    #[arg(long, visible_alias = "mem")]
    pub memory: Option<PathBuf>,

    /// Resume from the checkpoint file
    #[arg(short = 'r', long, requires = "memory")]
    pub resume: bool,

    /// Use the built-in mock engine instead of a real backend
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum CheckpointCommands {
    /// Show a checkpoint summary
    Show {
        /// Checkpoint file
        path: PathBuf,

        /// Print the full checkpoint as JSON
        #[arg(long)]
        json: bool,
    },
}
