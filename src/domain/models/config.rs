use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::convergence::ConvergencePolicy;

/// Main configuration structure for the proof agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Reasoning engine backend
    #[serde(default)]
    pub engine: EngineConfig,

    /// Convergence thresholds and run ceilings
    #[serde(default)]
    pub convergence: ConvergenceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which backend adapter serves reasoning-engine calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// OpenAI-compatible `/chat/completions` endpoint
    #[serde(alias = "openai")]
    OpenAiCompat,
    /// Local process fed the transcript on stdin
    Command,
    /// Canned responses, for dry runs
    Mock,
}

/// Reasoning engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Backend adapter
    #[serde(default = "default_engine_kind")]
    pub kind: EngineKind,

    /// Base URL of the chat-completions API (without `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding a bearer token, if the backend needs one
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Maximum tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Reasoning effort hint for backends that accept one
    #[serde(default = "default_reasoning_effort")]
    pub reasoning_effort: Option<String>,

    /// Wall-clock ceiling for one engine call, in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// Program run by the command engine
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments passed to `command`
    #[serde(default)]
    pub args: Vec<String>,

    /// Retries for transient HTTP failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_engine_kind() -> EngineKind {
    EngineKind::OpenAiCompat
}

fn default_base_url() -> String {
    "http://localhost:8000/v1".to_string()
}

fn default_model() -> String {
    "openai/gpt-oss-120b".to_string()
}

const fn default_temperature() -> f32 {
    0.1
}

const fn default_top_p() -> f32 {
    1.0
}

const fn default_max_tokens() -> u32 {
    128_000
}

#[allow(clippy::unnecessary_wraps)]
fn default_reasoning_effort() -> Option<String> {
    Some("low".to_string())
}

const fn default_call_timeout_secs() -> u64 {
    3600
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: default_engine_kind(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: None,
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            reasoning_effort: default_reasoning_effort(),
            call_timeout_secs: default_call_timeout_secs(),
            command: None,
            args: vec![],
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Convergence thresholds plus the outer run ceiling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConvergenceConfig {
    /// Consecutive passes required to accept a solution
    #[serde(default = "default_required_passes")]
    pub required_passes: u32,

    /// Consecutive failures before a run gives up
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    /// Verification iterations per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Whole-run attempts made by the driver
    #[serde(default = "default_max_runs")]
    pub max_runs: u32,
}

fn default_required_passes() -> u32 {
    ConvergencePolicy::default().required_passes
}

fn default_max_consecutive_failures() -> u32 {
    ConvergencePolicy::default().max_consecutive_failures
}

fn default_max_iterations() -> u32 {
    ConvergencePolicy::default().max_iterations
}

const fn default_max_runs() -> u32 {
    10
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            required_passes: default_required_passes(),
            max_consecutive_failures: default_max_consecutive_failures(),
            max_iterations: default_max_iterations(),
            max_runs: default_max_runs(),
        }
    }
}

impl ConvergenceConfig {
    /// Per-run thresholds.
    pub const fn policy(&self) -> ConvergencePolicy {
        ConvergencePolicy {
            required_passes: self.required_passes,
            max_consecutive_failures: self.max_consecutive_failures,
            max_iterations: self.max_iterations,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: plain, pretty, or json
    #[serde(default = "default_log_format")]
    pub format: String,

    /// File that receives a copy of every log line
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "plain".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}
