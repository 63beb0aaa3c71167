//! Domain layer for the proof agent
//!
//! This module contains the convergence state model and the port traits
//! that infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{CheckpointError, EngineError, OrchestratorError};
