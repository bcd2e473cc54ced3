use crate::config::GatherConfig;
use crate::error::{GitError, GitResult};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Result of executing a git command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

impl CommandOutput {
    /// Turn a non-zero exit into `GitError::CommandFailed`
    pub fn into_success(self, command: &str) -> GitResult<Self> {
        if self.success {
            return Ok(self);
        }

        Err(GitError::CommandFailed {
            command: command.to_string(),
            exit_code: self.exit_code,
            stderr: self.stderr.trim().to_string(),
        })
    }
}

/// Something that can run git with a bounded timeout
///
/// `run` only fails when no exit status could be obtained: the binary is
/// missing, the timeout expired, or the process could not be spawned. A
/// non-zero exit is still `Ok` so callers can inspect stderr.
pub trait GitRunner {
    fn run(&self, args: &[&str], timeout: Duration) -> GitResult<CommandOutput>;

    /// Like `run`, but a non-zero exit becomes an error
    fn execute(&self, args: &[&str], timeout: Duration) -> GitResult<CommandOutput> {
        self.run(args, timeout)?.into_success(&args.join(" "))
    }

    /// Trimmed stdout of a successful run, or `None` on any failure
    fn query(&self, args: &[&str], timeout: Duration) -> Option<String> {
        self.execute(args, timeout)
            .ok()
            .map(|output| output.stdout.trim().to_string())
    }
}

impl<R: GitRunner + ?Sized> GitRunner for &R {
    fn run(&self, args: &[&str], timeout: Duration) -> GitResult<CommandOutput> {
        (**self).run(args, timeout)
    }
}

/// Runs git as a child process
#[derive(Debug, Clone)]
pub struct GitExecutor {
    binary: String,
    repo_path: Option<PathBuf>,
}

impl GitExecutor {
    pub fn from_config(config: &GatherConfig) -> Self {
        Self {
            binary: config.git_binary.clone(),
            repo_path: config.repo_dir.clone(),
        }
    }

    fn spawn_error(&self, err: io::Error) -> GitError {
        if err.kind() == io::ErrorKind::NotFound {
            GitError::NotFound(self.binary.clone())
        } else {
            GitError::IoError(err)
        }
    }
}

impl GitRunner for GitExecutor {
    /// The timeout covers both the process exit and draining its output
    fn run(&self, args: &[&str], timeout: Duration) -> GitResult<CommandOutput> {
        let command = args.join(" ");
        let deadline = Instant::now() + timeout;
        debug!(command = %command, timeout_secs = timeout.as_secs(), "running git");

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(path) = &self.repo_path {
            // spawn reports a missing cwd as NotFound, which would read as a missing binary
            if !path.is_dir() {
                return Err(GitError::IoError(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("working directory {} does not exist", path.display()),
                )));
            }
            cmd.current_dir(path);
        }

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        // Drain both pipes while waiting so a chatty child cannot fill them and stall
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let status = match child.wait_timeout(remaining(deadline)) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                warn!(command = %command, timeout_secs = timeout.as_secs(), "git timed out");
                return Err(GitError::Timeout { command, timeout });
            }
            Err(e) => {
                let _ = child.kill();
                return Err(GitError::IoError(e));
            }
        };

        // A helper git left behind (ssh master, credential daemon) can hold the pipes open
        let (Some(stdout), Some(stderr)) = (collect(&stdout, deadline), collect(&stderr, deadline))
        else {
            warn!(command = %command, timeout_secs = timeout.as_secs(), "git output still open at timeout");
            return Err(GitError::Timeout { command, timeout });
        };

        let output = process_output(status, stdout, stderr);
        debug!(command = %command, exit_code = output.exit_code, "git finished");

        Ok(output)
    }
}

/// Build a CommandOutput from a finished process
fn process_output(status: ExitStatus, stdout: String, stderr: String) -> CommandOutput {
    CommandOutput {
        stdout,
        stderr,
        exit_code: status.code().unwrap_or(-1),
        success: status.success(),
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

fn spawn_reader<R>(pipe: Option<R>) -> Receiver<Vec<u8>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    match pipe {
        Some(mut pipe) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                let _ = tx.send(buf);
            });
        }
        None => {
            let _ = tx.send(Vec::new());
        }
    }
    rx
}

/// Output of one pipe, or `None` if it is still open at `deadline`
fn collect(rx: &Receiver<Vec<u8>>, deadline: Instant) -> Option<String> {
    match rx.recv_timeout(remaining(deadline)) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(String::new()),
    }
}
