//! JSON file checkpoint store.
//!
//! One pretty-printed JSON document per key. Saves go to a sibling temp file
//! that is renamed over the target, so a reader never sees a half-written
//! checkpoint and a failed save leaves the previous one intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::CheckpointError;
use crate::domain::models::{Checkpoint, OrchestratorState, SavedState};
use crate::domain::ports::CheckpointStore;

#[derive(Serialize)]
struct DocumentRef<'a> {
    #[serde(flatten)]
    state: &'a OrchestratorState,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_iterations: Option<u32>,
    timestamp: String,
}

#[derive(Deserialize)]
struct Document {
    #[serde(flatten)]
    state: SavedState,
    #[serde(default, alias = "max_runs")]
    max_iterations: Option<u32>,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Checkpoint store writing JSON files at the key path.
#[derive(Debug, Clone, Default)]
pub struct JsonFileStore {
    iteration_ceiling: Option<u32>,
}

impl JsonFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ceiling` in every document written.
    #[must_use]
    pub const fn with_iteration_ceiling(mut self, ceiling: u32) -> Self {
        self.iteration_ceiling = Some(ceiling);
        self
    }
}

#[async_trait]
impl CheckpointStore for JsonFileStore {
    async fn save(&self, key: &Path, state: &OrchestratorState) -> Result<(), CheckpointError> {
        let document = DocumentRef {
            state,
            max_iterations: self.iteration_ceiling,
            timestamp: Utc::now().to_rfc3339(),
        };
        let content = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = key.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| io_error(parent, source))?;
        }

        let temp_path = temp_sibling(key);
        if let Err(source) = fs::write(&temp_path, content).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(&temp_path, source));
        }
        if let Err(source) = fs::rename(&temp_path, key).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(key, source));
        }

        debug!(path = %key.display(), iteration = state.iteration, "Checkpoint written");
        Ok(())
    }

    async fn load(&self, key: &Path) -> Result<Checkpoint, CheckpointError> {
        let content = match fs::read_to_string(key).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CheckpointError::NotFound(key.to_path_buf()));
            }
            Err(source) => return Err(io_error(key, source)),
        };

        let document: Document =
            serde_json::from_str(&content).map_err(|source| CheckpointError::Malformed {
                path: key.to_path_buf(),
                source,
            })?;

        Ok(Checkpoint {
            state: document.state,
            max_iterations: document.max_iterations,
            timestamp: document.timestamp,
        })
    }
}

fn temp_sibling(key: &Path) -> PathBuf {
    let name = key
        .file_name()
        .map_or_else(|| "checkpoint".into(), |n| n.to_string_lossy().into_owned());
    key.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

fn io_error(path: &Path, source: std::io::Error) -> CheckpointError {
    CheckpointError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::domain::models::{Solution, Verdict};

    fn sample_state() -> OrchestratorState {
        let mut state = OrchestratorState::new("Prove it.", vec!["be brief".to_string()]);
        state.iteration = 7;
        state.solution = Some(Solution::new("**Detailed Solution** done"));
        state.verdict = Some(Verdict::fail("gap"));
        state
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let store = JsonFileStore::new().with_iteration_ceiling(30);

        store.save(&path, &sample_state()).await.unwrap();
        let checkpoint = store.load(&path).await.unwrap();

        assert_eq!(checkpoint.state.clone().resume("", &[]), sample_state());
        assert_eq!(checkpoint.max_iterations, Some(30));
        assert!(checkpoint.saved_at().is_some());
    }

    #[tokio::test]
    async fn test_save_creates_parent_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs").join("memory.json");
        let store = JsonFileStore::new();

        store.save(&path, &sample_state()).await.unwrap();
        store.save(&path, &sample_state()).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("memory.json")]);
    }

    #[tokio::test]
    async fn test_document_is_pretty_json_with_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        JsonFileStore::new()
            .save(&path, &sample_state())
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  \"problem_statement\": \"Prove it.\""));
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["verdict"]["passed"], false);
        assert_eq!(value["verdict"]["bug_report"], "gap");
        assert!(value["timestamp"].is_string());
        assert!(value.get("max_iterations").is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let result = JsonFileStore::new().load(&dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(CheckpointError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_garbage_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::new().load(&path).await;
        assert!(matches!(result, Err(CheckpointError::Malformed { .. })));
    }
}
