pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod logging;
pub mod report;

// Re-export commonly used types for convenience
pub use config::GatherConfig;
pub use context::{ContextGatherer, SessionContext};
pub use error::{AppError, AppResult, GitError, GitResult};
pub use git::{BranchSyncChecker, BranchSyncReport, GitExecutor, GitRunner, SyncStatus};
