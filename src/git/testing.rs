//! Scripted `GitRunner` for unit tests

use crate::error::{GitError, GitResult};
use crate::git::executor::{CommandOutput, GitRunner};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(&'static str),
    Fail(i32, &'static str),
    Timeout,
    NotFound,
    Io(&'static str),
}

/// Answers each command line from a fixed table and records what was asked
///
/// Commands missing from the table fail with exit code 128.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    replies: HashMap<String, Reply>,
    calls: RefCell<Vec<(String, Duration)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, command: &str, reply: Reply) -> Self {
        self.replies.insert(command.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(cmd, _)| cmd.clone()).collect()
    }

    pub fn timeout_for(&self, command: &str) -> Option<Duration> {
        self.calls
            .borrow()
            .iter()
            .find(|(cmd, _)| cmd == command)
            .map(|(_, timeout)| *timeout)
    }

    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|(cmd, _)| cmd.starts_with(prefix))
    }
}

impl GitRunner for ScriptedRunner {
    fn run(&self, args: &[&str], timeout: Duration) -> GitResult<CommandOutput> {
        let command = args.join(" ");
        self.calls.borrow_mut().push((command.clone(), timeout));

        let reply = self
            .replies
            .get(&command)
            .cloned()
            .unwrap_or(Reply::Fail(128, "fatal: unscripted command"));

        match reply {
            Reply::Ok(stdout) => Ok(CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code: 0,
                success: true,
            }),
            Reply::Fail(exit_code, stderr) => Ok(CommandOutput {
                stdout: String::new(),
                stderr: stderr.to_string(),
                exit_code,
                success: false,
            }),
            Reply::Timeout => Err(GitError::Timeout { command, timeout }),
            Reply::NotFound => Err(GitError::NotFound("git".to_string())),
            Reply::Io(message) => Err(GitError::IoError(io::Error::new(
                io::ErrorKind::PermissionDenied,
                message,
            ))),
        }
    }
}
