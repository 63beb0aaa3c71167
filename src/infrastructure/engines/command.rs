//! Local-process engine.
//!
//! Spawns the configured program once per call, writes the transcript to its
//! stdin as a JSON array of `{"role", "content"}` turns, and returns
//! everything it prints on stdout. This is the path for locally hosted
//! models, whose raw decode still carries channel markers.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::errors::EngineError;
use crate::domain::models::{EngineConfig, Transcript};
use crate::domain::ports::ReasoningEngine;

/// Reasoning engine backed by a local command
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    call_gate: Mutex<()>,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            call_gate: Mutex::new(()),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let program = config
            .command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| EngineError::NotConfigured("engine.command is not set".to_string()))?;
        Ok(Self::new(program, config.args.clone()))
    }
}

#[async_trait]
impl ReasoningEngine for CommandEngine {
    fn engine_id(&self) -> &str {
        "command"
    }

    async fn complete(&self, transcript: &Transcript) -> Result<String, EngineError> {
        let _gate = self.call_gate.lock().await;
        let input = serde_json::to_vec(transcript)
            .map_err(|e| EngineError::Process(format!("transcript encode: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::Unavailable(format!("Failed to spawn {}: {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Process("Failed to capture stdin".to_string()))?;
        // Feed stdin concurrently so a program echoing as it reads cannot
        // fill the stdout pipe and stall both sides.
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| EngineError::Process(format!("Failed to wait for process: {e}")))?;

        match writer.await {
            // The program may exit without reading; its status decides.
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(EngineError::Process(format!("stdin write: {e}")));
            }
            Err(e) => return Err(EngineError::Process(format!("stdin writer: {e}"))),
            Ok(_) => {}
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(program = %self.program, status = %output.status, "Engine process failed");
            return Err(EngineError::Process(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| EngineError::InvalidResponse(format!("stdout is not UTF-8: {e}")))?;
        debug!(program = %self.program, chars = text.len(), "Engine process finished");
        Ok(text)
    }

    async fn health_check(&self) -> Result<(), EngineError> {
        which(&self.program)
    }
}

/// Fail early when the program clearly cannot be spawned.
fn which(program: &str) -> Result<(), EngineError> {
    let path = std::path::Path::new(program);
    if path.components().count() > 1 && !path.exists() {
        return Err(EngineError::Unavailable(format!("{program} does not exist")));
    }
    Ok(())
}
