//! `checkpoint` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, ContentArrangement, Table};
use console::style;
use serde::Serialize;

use crate::cli::output::{output, truncate, CommandOutput};
use crate::cli::types::CheckpointCommands;
use crate::domain::models::{Checkpoint, SavedState, Verdict};
use crate::domain::ports::CheckpointStore;
use crate::infrastructure::checkpoint::JsonFileStore;

#[derive(Debug, Serialize)]
pub struct CheckpointOutput {
    pub path: PathBuf,
    pub saved_at: Option<String>,
    pub max_iterations: Option<u32>,
    pub state: SavedState,
}

impl CheckpointOutput {
    pub fn new(path: &Path, checkpoint: Checkpoint) -> Self {
        Self {
            path: path.to_path_buf(),
            saved_at: checkpoint.timestamp,
            max_iterations: checkpoint.max_iterations,
            state: checkpoint.state,
        }
    }

    fn verdict_label(&self) -> String {
        match &self.state.verdict {
            None => style("none").dim().to_string(),
            Some(Verdict::Pass) => style("pass").green().bold().to_string(),
            Some(Verdict::Fail { .. }) => style("fail").red().bold().to_string(),
        }
    }
}

impl CommandOutput for CheckpointOutput {
    fn to_human(&self) -> String {
        let iteration = self.max_iterations.map_or_else(
            || self.state.iteration.to_string(),
            |ceiling| format!("{} / {ceiling}", self.state.iteration),
        );
        let solution = self
            .state
            .solution
            .as_ref()
            .map_or_else(|| "not generated".to_string(), |s| format!("{} chars", s.as_str().len()));
        let bug_report = self
            .state
            .verdict
            .as_ref()
            .map(Verdict::bug_report)
            .filter(|report| !report.is_empty())
            .map_or_else(|| "-".to_string(), |report| truncate(report, 120));

        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);
        let rows = [
            (
                "Problem",
                self.state
                    .problem_statement
                    .as_deref()
                    .map_or_else(|| "-".to_string(), |p| truncate(p.trim(), 80)),
            ),
            (
                "Other prompts",
                self.state.other_prompts.as_ref().map_or(0, Vec::len).to_string(),
            ),
            ("Iteration", iteration),
            ("Solution", solution),
            ("Verdict", self.verdict_label()),
            ("Bug report", bug_report),
            ("Saved at", self.saved_at.clone().unwrap_or_else(|| "-".to_string())),
        ];
        for (label, value) in rows {
            table.add_row(vec![Cell::new(style(label).bold().to_string()), Cell::new(value)]);
        }

        format!("Checkpoint {}\n{table}", self.path.display())
    }
}

pub async fn execute(command: CheckpointCommands) -> Result<()> {
    match command {
        CheckpointCommands::Show { path, json } => {
            let checkpoint = JsonFileStore::new()
                .load(&path)
                .await
                .with_context(|| format!("Failed to load checkpoint {}", path.display()))?;
            output(&CheckpointOutput::new(&path, checkpoint), json);
            Ok(())
        }
    }
}
