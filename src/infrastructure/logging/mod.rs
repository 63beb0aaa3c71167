//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Plain progress-transcript format with timestamped progress lines
//! - Pretty and JSON formats
//! - Optional file sink mirroring stdout

pub mod config;
pub mod logger;
pub mod progress;

pub use config::{LogConfig, LogFormat};
pub use logger::LoggerImpl;
pub use progress::{ProgressFormat, PROGRESS_MARKER};
