use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while running git
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Git executable '{0}' not found")]
    NotFound(String),

    #[error("Command 'git {command}' timed out after {}s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("Command 'git {command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Top-level error for faults the report cannot absorb as warnings
///
/// Anything that reaches this type ends the run with the fallback report and
/// exit status 1.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid arguments: {0}")]
    Usage(String),

    #[error("Unexpected panic: {0}")]
    Panic(String),
}

/// Result type for git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
