//! Layered configuration.
//!
//! Built-in defaults, then the project YAML file (or `--config`), then
//! `.proof-agent/local.yaml`, then `PROOF_AGENT_*` variables. The merged
//! result is validated before use.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX, LOCAL_CONFIG, PROJECT_CONFIG};
