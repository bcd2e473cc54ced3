use crate::config::GatherConfig;
use crate::error::GitError;
use crate::git::executor::GitRunner;
use crate::git::parser::{TRACKING_FORMAT, TrackDelta, TrackingRef, parse_tracking_refs};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const NO_REMOTE: &str = "No remote configured";
pub const REMOTE_CHECK_FAILED: &str = "Unable to check remote configuration";
pub const GIT_NOT_FOUND: &str = "Git command not found";
pub const AUTH_REQUIRED: &str = "Authentication required - check credentials";
pub const TRACKING_UNAVAILABLE: &str = "Unable to check branch tracking status";

/// Where a branch stands relative to its upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Unknown,
    NoTracking,
    Synced,
    Ahead,
    Behind,
    Diverged,
}

impl SyncStatus {
    pub fn classify(delta: TrackDelta) -> Self {
        match (delta.ahead > 0, delta.behind > 0) {
            (true, true) => SyncStatus::Diverged,
            (true, false) => SyncStatus::Ahead,
            (false, true) => SyncStatus::Behind,
            (false, false) => SyncStatus::Synced,
        }
    }
}

/// A local branch that is ahead of, behind, or diverged from its upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSyncEntry {
    pub branch: String,
    pub status: SyncStatus,
    pub ahead: usize,
    pub behind: usize,
    pub tracking: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSyncReport {
    pub current_branch_status: SyncStatus,
    pub out_of_sync_branches: Vec<BranchSyncEntry>,
    pub fetch_failed: bool,
    pub fetch_error: Option<String>,
}

impl BranchSyncReport {
    fn failed(error: String) -> Self {
        Self {
            fetch_failed: true,
            fetch_error: Some(error),
            ..Self::default()
        }
    }

    fn soft_error(error: &str) -> Self {
        Self {
            fetch_error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// Fold enumerated branches into the report, in enumeration order
    pub fn record_branches(&mut self, branches: &[TrackingRef], current_branch: &str) {
        for branch in branches {
            let is_current = branch.name == current_branch;

            let Some(tracking) = &branch.upstream else {
                if is_current {
                    self.current_branch_status = SyncStatus::NoTracking;
                }
                continue;
            };

            let status = SyncStatus::classify(branch.delta);
            if is_current {
                self.current_branch_status = status;
            }

            if status != SyncStatus::Synced {
                self.out_of_sync_branches.push(BranchSyncEntry {
                    branch: branch.name.clone(),
                    status,
                    ahead: branch.delta.ahead,
                    behind: branch.delta.behind,
                    tracking: tracking.clone(),
                });
            }
        }
    }
}

/// Fetches once and compares every local branch with its upstream
#[derive(Debug)]
pub struct BranchSyncChecker<R> {
    runner: R,
    query_timeout: Duration,
    fetch_timeout: Duration,
}

impl<R: GitRunner> BranchSyncChecker<R> {
    pub fn new(runner: R, config: &GatherConfig) -> Self {
        Self {
            runner,
            query_timeout: config.query_timeout,
            fetch_timeout: config.fetch_timeout,
        }
    }

    /// Build the sync report for `current_branch`
    ///
    /// Never fails: a missing remote, a failed fetch or an unreadable ref
    /// listing ends the check early with `fetch_error` set. Only fetch
    /// problems set `fetch_failed`.
    pub fn check(&self, current_branch: &str) -> BranchSyncReport {
        if let Err(error) = self.check_remote() {
            info!(reason = error, "skipping branch sync");
            return BranchSyncReport::soft_error(error);
        }

        if let Err(error) = self.fetch() {
            warn!(error = %error, "git fetch failed");
            return BranchSyncReport::failed(error);
        }

        let args = ["for-each-ref", TRACKING_FORMAT, "refs/heads/"];
        let listing = match self.runner.execute(&args, self.query_timeout) {
            Ok(output) => output.stdout,
            Err(e) => {
                debug!(error = %e, "branch listing failed");
                return BranchSyncReport::soft_error(TRACKING_UNAVAILABLE);
            }
        };

        let mut report = BranchSyncReport::default();
        let branches = parse_tracking_refs(listing.trim());
        report.record_branches(&branches, current_branch);

        debug!(
            branches = branches.len(),
            out_of_sync = report.out_of_sync_branches.len(),
            "branch sync checked"
        );

        report
    }

    /// Succeeds when at least one remote is configured
    fn check_remote(&self) -> Result<(), &'static str> {
        match self.runner.run(&["remote", "-v"], self.query_timeout) {
            Ok(output) if output.stdout.trim().is_empty() => Err(NO_REMOTE),
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(error = %e, "remote listing failed");
                Err(REMOTE_CHECK_FAILED)
            }
        }
    }

    fn fetch(&self) -> Result<(), String> {
        match self.runner.run(&["fetch", "--all", "--quiet"], self.fetch_timeout) {
            Ok(output) if output.success => Ok(()),
            Ok(output) => Err(describe_fetch_failure(&output.stderr)),
            Err(GitError::Timeout { timeout, .. }) => Err(format!(
                "Git fetch timed out ({}s limit)",
                timeout.as_secs()
            )),
            Err(GitError::NotFound(_)) => Err(GIT_NOT_FOUND.to_string()),
            // Spawn errors are not git's stderr; keep them out of the credential check
            Err(e) => Err(format!("Fetch failed: {e}")),
        }
    }
}

/// Map fetch stderr onto the message reported to the user
pub fn describe_fetch_failure(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        return "Fetch failed: Unknown error".to_string();
    }

    let lowered = stderr.to_lowercase();
    if lowered.contains("authentication") || lowered.contains("permission") {
        AUTH_REQUIRED.to_string()
    } else {
        format!("Fetch failed: {stderr}")
    }
}
