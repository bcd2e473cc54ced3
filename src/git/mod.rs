pub mod executor;
pub mod parser;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use executor::{CommandOutput, GitExecutor, GitRunner};
pub use parser::{TrackDelta, TrackingRef, parse_track_annotation, parse_tracking_refs};
pub use sync::{BranchSyncChecker, BranchSyncEntry, BranchSyncReport, SyncStatus};
