//! In-memory checkpoint store.
//!
//! Keeps every saved state per key, so callers can inspect the full history
//! of a run as well as the latest checkpoint. Nothing touches the disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::errors::CheckpointError;
use crate::domain::models::{Checkpoint, OrchestratorState, SavedState};
use crate::domain::ports::CheckpointStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    history: Arc<RwLock<HashMap<PathBuf, Vec<(SavedState, String)>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `state` under `key` as if it had been saved earlier.
    ///
    /// Accepts partial states, which lets tests mimic older checkpoints.
    pub async fn seed(&self, key: &Path, state: impl Into<SavedState>) {
        self.history
            .write()
            .await
            .entry(key.to_path_buf())
            .or_default()
            .push((state.into(), Utc::now().to_rfc3339()));
    }

    /// Every state saved under `key`, oldest first.
    pub async fn history(&self, key: &Path) -> Vec<SavedState> {
        self.history
            .read()
            .await
            .get(key)
            .map(|saves| saves.iter().map(|(state, _)| state.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryStore {
    async fn save(&self, key: &Path, state: &OrchestratorState) -> Result<(), CheckpointError> {
        self.seed(key, state.clone()).await;
        Ok(())
    }

    async fn load(&self, key: &Path) -> Result<Checkpoint, CheckpointError> {
        let history = self.history.read().await;
        let (state, timestamp) = history
            .get(key)
            .and_then(|saves| saves.last())
            .ok_or_else(|| CheckpointError::NotFound(key.to_path_buf()))?;

        Ok(Checkpoint {
            state: state.clone(),
            max_iterations: None,
            timestamp: Some(timestamp.clone()),
        })
    }
}
