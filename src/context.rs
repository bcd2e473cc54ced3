use crate::config::GatherConfig;
use crate::git::executor::GitRunner;
use crate::git::sync::{BranchSyncChecker, BranchSyncReport};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_USERNAME: &str = "User";
pub const UNKNOWN_BRANCH: &str = "unknown";

pub const USER_NAME_MISSING: &str = "Git user.name not configured";
pub const USER_EMAIL_MISSING: &str = "Git user.email not configured";
pub const DETACHED_HEAD: &str = "Not on a branch (detached HEAD)";
pub const BRANCH_UNKNOWN: &str = "Unable to determine current branch";
pub const NOT_A_REPOSITORY: &str = "Not in a git repository";

/// Identity and branch state handed to the orchestration layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub git_username: String,
    pub git_email: String,
    pub current_branch: String,
    pub repo_root: String,
    pub branch_sync: Option<BranchSyncReport>,
    pub warnings: Vec<String>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            git_username: DEFAULT_USERNAME.to_string(),
            git_email: String::new(),
            current_branch: UNKNOWN_BRANCH.to_string(),
            repo_root: String::new(),
            branch_sync: None,
            warnings: Vec::new(),
        }
    }
}

impl SessionContext {
    /// Minimal report emitted when gathering itself broke
    pub fn fallback(fault: &str) -> Self {
        Self {
            warnings: vec![format!("Critical error during initialization: {fault}")],
            ..Self::default()
        }
    }

    fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(warning = %message, "session warning");
        self.warnings.push(message);
    }
}

/// Collects a `SessionContext` through a `GitRunner`
#[derive(Debug)]
pub struct ContextGatherer<R> {
    runner: R,
    config: GatherConfig,
}

impl<R: GitRunner> ContextGatherer<R> {
    pub fn new(runner: R, config: GatherConfig) -> Self {
        Self { runner, config }
    }

    /// Run every step in order; each failure only adds a warning
    pub fn gather(&self) -> SessionContext {
        let mut context = SessionContext::default();

        match self.query(&["config", "user.name"]) {
            Some(name) => context.git_username = name,
            None => context.warn(USER_NAME_MISSING),
        }

        match self.query(&["config", "user.email"]) {
            Some(email) => context.git_email = email,
            None => context.warn(USER_EMAIL_MISSING),
        }

        self.resolve_branch(&mut context);

        match self.query(&["rev-parse", "--show-toplevel"]) {
            Some(root) => context.repo_root = root,
            None => context.warn(NOT_A_REPOSITORY),
        }

        if !context.repo_root.is_empty() {
            let report = BranchSyncChecker::new(&self.runner, &self.config)
                .check(&context.current_branch);

            if report.fetch_failed {
                let error = report.fetch_error.as_deref().unwrap_or("Unknown error");
                context.warn(format!("Branch sync check failed: {error}"));
            } else if let Some(error) = &report.fetch_error {
                context.warn(error.clone());
            }

            context.branch_sync = Some(report);
        }

        context
    }

    fn resolve_branch(&self, context: &mut SessionContext) {
        if let Some(branch) = self.query(&["branch", "--show-current"]) {
            context.current_branch = branch;
            return;
        }

        // Detached HEAD: show-current prints nothing
        match self.query(&["rev-parse", "--short", "HEAD"]) {
            Some(rev) => {
                context.current_branch = format!("detached@{rev}");
                context.warn(DETACHED_HEAD);
            }
            None => context.warn(BRANCH_UNKNOWN),
        }
    }

    /// Non-empty trimmed stdout, or `None`
    fn query(&self, args: &[&str]) -> Option<String> {
        self.runner
            .query(args, self.config.query_timeout)
            .filter(|out| !out.is_empty())
    }
}
