//! Command-line interface

pub mod commands;
pub mod output;
pub mod types;

pub use types::{CheckpointCommands, Cli, Commands, SolveArgs};

/// Print a fatal error and its causes to stderr.
pub fn report_error(err: &anyhow::Error) {
    eprintln!("{} {err}", console::style("Error:").red().bold());
    for cause in err.chain().skip(1) {
        eprintln!("  {} {cause}", console::style("caused by:").dim());
    }
}
