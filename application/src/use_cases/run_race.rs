//! Run Race use case
//!
//! Races every registered source for the same key and returns the first
//! success, or the complete failure breakdown when nobody succeeds.
//!
//! # Coordination
//!
//! One tokio task per source is spawned into a [`JoinSet`]. The coordinator
//! is the only consumer of that set, so every terminal outcome (success,
//! failure, timeout, panic) funnels through a single point and is counted by
//! the [`ResultAggregator`]. The loop ends either on the first success or
//! once the aggregator reports that the whole source set is exhausted; it
//! never waits on a subset of sources that might not report.
//!
//! # Winner selection
//!
//! When the first success is dequeued, any outcomes that already finished
//! are collected with [`JoinSet::try_join_next`] and the winner is chosen
//! among them with the configured [`TieBreak`](responder_domain::TieBreak)
//! (by default the source registered first).
//!
//! # Cancellation
//!
//! After a winner is chosen the shared [`CancellationToken`] is cancelled and
//! the remaining tasks are aborted and joined. This is best-effort: the
//! in-flight futures are dropped, but a request that already reached the
//! remote side may still be processed there. Late results are discarded.

use crate::config::{RaceParams, RegisteredSource, SourceRegistry};
use crate::ports::progress::{NoProgress, RaceProgressNotifier};
use crate::use_cases::run_attempt::AttemptRunner;
use responder_domain::{
    Attempt, AttemptOutcome, FailureReason, QueryKey, RaceFailure, RaceWin, ResultAggregator,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Race-level errors
///
/// Per-attempt failures never surface here individually; they are either
/// ignored because a winner was found or folded into `AllSourcesFailed`.
#[derive(Error, Debug)]
pub enum RaceError {
    #[error("No sources configured")]
    NoSources,

    #[error("Per-attempt timeout must be greater than zero")]
    InvalidTimeout,

    #[error("{0}")]
    AllSourcesFailed(RaceFailure),
}

impl RaceError {
    /// The per-source breakdown, when every source failed
    pub fn failure(&self) -> Option<&RaceFailure> {
        match self {
            RaceError::AllSourcesFailed(failure) => Some(failure),
            _ => None,
        }
    }

    /// True when the race was never attempted because of bad configuration
    pub fn is_config_error(&self) -> bool {
        matches!(self, RaceError::NoSources | RaceError::InvalidTimeout)
    }
}

/// Input for the RunRace use case
#[derive(Debug, Clone)]
pub struct RunRaceInput {
    /// The key every source is queried for
    pub key: QueryKey,
    /// Timeout and tie-break settings
    pub params: RaceParams,
}

impl RunRaceInput {
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            params: RaceParams::default(),
        }
    }

    pub fn with_params(mut self, params: RaceParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.params = self.params.with_timeout(timeout);
        self
    }
}

/// Use case for racing the sources of a registry
pub struct RunRaceUseCase {
    registry: Arc<SourceRegistry>,
}

impl RunRaceUseCase {
    pub fn new(registry: Arc<SourceRegistry>) -> Self {
        Self { registry }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunRaceInput) -> Result<RaceWin, RaceError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunRaceInput,
        progress: &dyn RaceProgressNotifier,
    ) -> Result<RaceWin, RaceError> {
        run_race(self.registry.sources(), &input.key, &input.params, progress).await
    }
}

/// Race `sources` for `key`, giving each attempt `timeout`.
///
/// Convenience entry point for callers that do not need a registry or
/// progress reporting.
pub async fn race(
    sources: &[RegisteredSource],
    key: &QueryKey,
    timeout: Duration,
) -> Result<RaceWin, RaceError> {
    let params = RaceParams::default().with_timeout(timeout);
    run_race(sources, key, &params, &NoProgress).await
}

async fn run_race(
    sources: &[RegisteredSource],
    key: &QueryKey,
    params: &RaceParams,
    progress: &dyn RaceProgressNotifier,
) -> Result<RaceWin, RaceError> {
    if sources.is_empty() {
        return Err(RaceError::NoSources);
    }
    if !params.is_valid() {
        return Err(RaceError::InvalidTimeout);
    }

    info!(
        "Racing {} sources for key {} (timeout {:?})",
        sources.len(),
        key,
        params.timeout
    );
    progress.on_race_start(key, sources.len());

    let started = Instant::now();
    let cancel = CancellationToken::new();
    let runner = AttemptRunner::new(params.timeout).with_cancellation(cancel.clone());
    let mut join_set = JoinSet::new();

    for (index, source) in sources.iter().enumerate() {
        let runner = runner.clone();
        let source = source.clone();
        let key = key.clone();

        join_set.spawn(async move { runner.run_guarded(&source, index, &key).await });
    }

    let mut aggregator = ResultAggregator::new(sources.len());
    let mut reported = vec![false; sources.len()];

    while let Some(joined) = join_set.join_next().await {
        let attempt = match joined {
            Ok(attempt) => attempt,
            Err(e) => {
                warn!("Attempt task join error: {}", e);
                continue;
            }
        };

        reported[attempt.index()] = true;
        progress.on_attempt_complete(&attempt);
        aggregator.record(&attempt);

        if attempt.is_success() {
            let mut ready = vec![attempt];
            while let Some(joined) = join_set.try_join_next() {
                if let Ok(other) = joined {
                    reported[other.index()] = true;
                    progress.on_attempt_complete(&other);
                    aggregator.record(&other);
                    ready.push(other);
                }
            }

            cancel.cancel();
            join_set.shutdown().await;

            // ready[0] is the success that ended the loop
            let winner = params.tie_break.pick(&ready).unwrap_or(&ready[0]);
            let tied = ready.iter().filter(|a| a.is_success()).count();
            if tied > 1 {
                debug!(
                    "{} sources succeeded together, {} wins the tie-break",
                    tied,
                    winner.source()
                );
            }

            let win = into_win(winner, started.elapsed(), aggregator.completed());
            info!("Source {} won the race in {}ms", win.winner, win.elapsed_ms);
            progress.on_race_complete(Some(&win.winner));
            return Ok(win);
        }

        if let AttemptOutcome::Failure(reason) = attempt.outcome() {
            debug!(
                "Source {} failed ({} of {} reported): {}",
                attempt.source(),
                aggregator.completed(),
                aggregator.total(),
                reason
            );
        }

        if aggregator.is_exhausted() {
            break;
        }
    }

    // A task that could not be joined never produced an attempt; account for
    // it so the breakdown still has one entry per source.
    for (index, source) in sources.iter().enumerate() {
        if !reported[index] {
            warn!("Source {} never reported an outcome", source.name());
            aggregator.record_failure(
                source.name().clone(),
                FailureReason::panicked("attempt task did not complete"),
            );
        }
    }

    let failure = aggregator.into_failure();
    warn!("All {} sources failed for key {}", failure.len(), key);
    progress.on_race_complete(None);
    Err(RaceError::AllSourcesFailed(failure))
}

fn into_win(winner: &Attempt, elapsed: Duration, observed: usize) -> RaceWin {
    let payload = match winner.outcome() {
        AttemptOutcome::Success(payload) => payload.clone(),
        _ => String::new(),
    };
    RaceWin::new(winner.source().clone(), payload, elapsed).with_attempts_observed(observed)
}
