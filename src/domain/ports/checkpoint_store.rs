use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::CheckpointError;
use crate::domain::models::{Checkpoint, OrchestratorState};

/// Durable snapshots of orchestrator state, keyed by a caller-supplied path
///
/// Implementations must make `save` atomic: a failed save leaves the
/// previous checkpoint under the same key intact. Saving the same state
/// twice is harmless.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persist `state` under `key`, stamped with the current wall-clock time
    async fn save(&self, key: &Path, state: &OrchestratorState) -> Result<(), CheckpointError>;

    /// Load the checkpoint stored under `key`
    ///
    /// Returns `CheckpointError::NotFound` when nothing has been saved there.
    async fn load(&self, key: &Path) -> Result<Checkpoint, CheckpointError>;
}
