//! Result aggregation for a single race.
//!
//! [`ResultAggregator`] counts terminal outcomes against the number of
//! sources in the race. The coordinator consults [`is_exhausted`] to know
//! when no further outcome can arrive, so it never waits on a source that
//! will not report.
//!
//! The aggregator is not shared across races and is owned by the single
//! task that consumes attempt outcomes, so it carries no synchronization.
//!
//! [`is_exhausted`]: ResultAggregator::is_exhausted

use super::attempt::{Attempt, AttemptOutcome, FailureReason};
use super::result::{RaceFailure, SourceFailure};
use crate::core::source_name::SourceName;

#[derive(Debug, Clone)]
pub struct ResultAggregator {
    total: usize,
    completed: usize,
    succeeded: bool,
    failures: Vec<SourceFailure>,
}

impl ResultAggregator {
    /// Create an aggregator expecting one terminal outcome per source.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: false,
            failures: Vec::with_capacity(total),
        }
    }

    /// Record a terminal attempt.
    ///
    /// Returns `false` if the attempt is still pending or if every expected
    /// outcome has already been recorded.
    pub fn record(&mut self, attempt: &Attempt) -> bool {
        match attempt.outcome() {
            AttemptOutcome::Pending => false,
            AttemptOutcome::Success(_) => self.record_success(),
            AttemptOutcome::Failure(reason) => {
                self.record_failure(attempt.source().clone(), reason.clone())
            }
        }
    }

    pub fn record_success(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.completed += 1;
        self.succeeded = true;
        true
    }

    pub fn record_failure(&mut self, source: SourceName, reason: FailureReason) -> bool {
        if self.is_full() {
            return false;
        }
        self.completed += 1;
        self.failures.push(SourceFailure::new(source, reason));
        true
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn remaining(&self) -> usize {
        self.total - self.completed
    }

    pub fn has_success(&self) -> bool {
        self.succeeded
    }

    /// True once every source has reported and none of them succeeded.
    pub fn is_exhausted(&self) -> bool {
        self.is_full() && !self.succeeded
    }

    /// Failures recorded so far, in the order they were received.
    pub fn build_failure(&self) -> RaceFailure {
        RaceFailure::new(self.failures.clone())
    }

    pub fn into_failure(self) -> RaceFailure {
        RaceFailure::new(self.failures)
    }

    fn is_full(&self) -> bool {
        self.completed >= self.total
    }
}
