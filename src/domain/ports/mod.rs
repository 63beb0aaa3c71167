//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces that infrastructure
//! adapters implement:
//! - ReasoningEngine: text-generation backend round trips
//! - CheckpointStore: durable orchestrator snapshots
//!
//! These traits keep the convergence loop independent of any particular
//! backend or storage medium.

pub mod checkpoint_store;
pub mod reasoning_engine;

pub use checkpoint_store::CheckpointStore;
pub use reasoning_engine::ReasoningEngine;
