use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::{Config, EngineKind};

/// Project config file, relative to the working directory
pub const PROJECT_CONFIG: &str = ".proof-agent/config.yaml";
/// Optional local overrides, relative to the working directory
pub const LOCAL_CONFIG: &str = ".proof-agent/local.yaml";
/// Prefix of environment overrides; `__` separates nested keys
pub const ENV_PREFIX: &str = "PROOF_AGENT_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: plain, pretty, json")]
    InvalidLogFormat(String),

    #[error("Invalid required_passes: {0}. Must be at least 1")]
    InvalidRequiredPasses(u32),

    #[error("Invalid max_consecutive_failures: {0}. Must be at least 1")]
    InvalidMaxConsecutiveFailures(u32),

    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid max_runs: {0}. Must be at least 1")]
    InvalidMaxRuns(u32),

    #[error("Invalid call_timeout_secs: {0}. Must be at least 1")]
    InvalidCallTimeout(u64),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Engine base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Engine model cannot be empty")]
    EmptyModel,

    #[error("Command engine requires engine.command")]
    MissingCommand,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `config_path` if given, else .proof-agent/config.yaml
    /// 3. .proof-agent/local.yaml (optional)
    /// 4. Environment variables (PROOF_AGENT_* prefix, highest priority)
    ///
    /// Missing project files are skipped; a missing `config_path` is an error.
    pub fn load(config_path: Option<&Path>) -> Result<Config> {
        if let Some(path) = config_path {
            anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
        }

        let config: Config = Self::figment(config_path)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, without environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The merged provider stack used by [`ConfigLoader::load`]
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let primary = config_path.map_or_else(
            || Yaml::file(PROJECT_CONFIG),
            |path| Yaml::file(path),
        );

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(primary)
            .merge(Yaml::file(LOCAL_CONFIG))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["plain", "pretty", "json"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let convergence = &config.convergence;
        if convergence.required_passes == 0 {
            return Err(ConfigError::InvalidRequiredPasses(0));
        }
        if convergence.max_consecutive_failures == 0 {
            return Err(ConfigError::InvalidMaxConsecutiveFailures(0));
        }
        if convergence.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(0));
        }
        if convergence.max_runs == 0 {
            return Err(ConfigError::InvalidMaxRuns(0));
        }

        let engine = &config.engine;
        if engine.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidCallTimeout(0));
        }

        match engine.kind {
            EngineKind::OpenAiCompat => {
                if engine.base_url.trim().is_empty() {
                    return Err(ConfigError::EmptyBaseUrl);
                }
                if engine.model.trim().is_empty() {
                    return Err(ConfigError::EmptyModel);
                }
                if engine.initial_backoff_ms >= engine.max_backoff_ms {
                    return Err(ConfigError::InvalidBackoff(
                        engine.initial_backoff_ms,
                        engine.max_backoff_ms,
                    ));
                }
            }
            EngineKind::Command => {
                if engine.command.as_deref().map_or(true, |c| c.trim().is_empty()) {
                    return Err(ConfigError::MissingCommand);
                }
            }
            EngineKind::Mock => {}
        }

        Ok(())
    }
}
