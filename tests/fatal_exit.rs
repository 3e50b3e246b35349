//! `fatal` terminates the process, so it is exercised in a child process:
//! the test binary re-runs itself with only the child test selected.

use esl_logger::{fatal, AsyncLogger, FATAL_EXIT_CODE};
use std::env;
use std::process::Command;
use tempfile::TempDir;

const CHILD_ENV: &str = "ESL_LOGGER_FATAL_CHILD";
const CHILD_LOG_ENV: &str = "ESL_LOGGER_FATAL_CHILD_LOG";

/// Only does anything when spawned by the tests below
#[test]
fn fatal_child_process() {
    if env::var_os(CHILD_ENV).is_none() {
        return;
    }

    let target = env::var_os(CHILD_LOG_ENV).map(std::path::PathBuf::from);
    let environment = if target.is_some() { "production" } else { "test" };
    let logger = AsyncLogger::new("doomed", environment, target.as_deref());

    logger.info("about to fail");
    fatal!(logger, "unrecoverable state: {}", 7);
}

fn run_child(log_file: Option<&std::path::Path>) -> std::process::Output {
    let mut command = Command::new(env::current_exe().expect("test binary path"));
    command
        .args(["fatal_child_process", "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1");
    if let Some(path) = log_file {
        command.env(CHILD_LOG_ENV, path);
    }
    command.output().expect("Failed to spawn child test process")
}

#[test]
fn test_fatal_exits_with_status_one() {
    let output = run_child(None);
    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));

    // The harness never got to report the child test as passed
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("test result: ok"));
}

#[test]
fn test_fatal_exits_with_file_sink() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fatal.log");

    let output = run_child(Some(&log_file));
    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
}
