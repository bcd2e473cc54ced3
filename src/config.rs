use std::path::PathBuf;
use std::time::Duration;

/// Timeout for lightweight queries (config, branch, rev-parse, remote, for-each-ref)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for `git fetch --all`
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime settings for one gathering pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatherConfig {
    /// Directory git runs in; `None` means the process working directory
    pub repo_dir: Option<PathBuf>,
    pub git_binary: String,
    pub query_timeout: Duration,
    pub fetch_timeout: Duration,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            repo_dir: None,
            git_binary: "git".to_string(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl GatherConfig {
    pub fn with_repo_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_git_binary<S: Into<String>>(mut self, binary: S) -> Self {
        self.git_binary = binary.into();
        self
    }
}
