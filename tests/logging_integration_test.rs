// Integration tests for logging functionality
// Note: the global subscriber can be installed once per process, so this
// binary holds a single test.

use std::fs;

use proof_agent::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl};
use tempfile::TempDir;
use tracing::{debug, info, warn};

#[test]
fn test_plain_file_transcript() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs").join("run.log");

    let config = LogConfig {
        level: "info".to_string(),
        format: LogFormat::Plain,
        file: Some(log_path.clone()),
        enable_stdout: false,
    };

    let logger = temp_env::with_var_unset("RUST_LOG", || LoggerImpl::init(&config)).unwrap();
    assert_eq!(logger.log_file(), Some(log_path.as_path()));

    info!(">>>>>>> hello");
    info!("Number of iterations: 1, number of corrects: 1, number of errors: 0");
    debug!("not at the configured level");
    warn!(path = "memory.json", "Failed to save checkpoint");

    // A second install in the same process is refused.
    assert!(LoggerImpl::init(&config).is_err());

    let content = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected log content:\n{content}");

    assert!(lines[0].starts_with('['));
    assert_eq!(&lines[0][20..22], "] ");
    assert_eq!(&lines[0][22..], ">>>>>>> hello");

    assert_eq!(
        lines[1],
        "Number of iterations: 1, number of corrects: 1, number of errors: 0"
    );
    assert_eq!(lines[2], "WARN: Failed to save checkpoint path=memory.json");
}
