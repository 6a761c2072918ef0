//! Progress notification port
//!
//! Defines the interface for reporting progress while a race runs.

use responder_domain::{Attempt, QueryKey, SourceName};

/// Callback for progress updates during a race
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain lines, nothing).
/// Callbacks are invoked from the coordinating task only, never from
/// the concurrent attempts themselves.
pub trait RaceProgressNotifier: Send + Sync {
    /// Called once before any source is contacted
    fn on_race_start(&self, key: &QueryKey, total_sources: usize);

    /// Called for every terminal attempt the coordinator observes
    fn on_attempt_complete(&self, attempt: &Attempt);

    /// Called when the race concludes; `winner` is `None` on total failure
    fn on_race_complete(&self, winner: Option<&SourceName>);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RaceProgressNotifier for NoProgress {
    fn on_race_start(&self, _key: &QueryKey, _total_sources: usize) {}
    fn on_attempt_complete(&self, _attempt: &Attempt) {}
    fn on_race_complete(&self, _winner: Option<&SourceName>) {}
}
