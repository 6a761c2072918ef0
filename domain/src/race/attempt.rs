//! Attempt entity and its outcome types

use crate::core::source_name::SourceName;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Why a single attempt did not produce a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// The source did not answer before its deadline
    Timeout { after_ms: u64 },
    /// Connection, protocol or HTTP status failure
    Transport { detail: String },
    /// The source answered, but the payload was rejected by a validator
    InvalidResponse { detail: String },
    /// The coordinator stopped waiting because another source already won
    Cancelled,
    /// The concurrent unit running the attempt died before reporting
    Panicked { detail: String },
}

impl FailureReason {
    pub fn timeout(after: Duration) -> Self {
        FailureReason::Timeout {
            after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        FailureReason::Transport {
            detail: detail.into(),
        }
    }

    pub fn invalid_response(detail: impl Into<String>) -> Self {
        FailureReason::InvalidResponse {
            detail: detail.into(),
        }
    }

    pub fn panicked(detail: impl Into<String>) -> Self {
        FailureReason::Panicked {
            detail: detail.into(),
        }
    }

    /// Short machine-readable tag, matching the serialized `kind`
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::Timeout { .. } => "timeout",
            FailureReason::Transport { .. } => "transport",
            FailureReason::InvalidResponse { .. } => "invalid_response",
            FailureReason::Cancelled => "cancelled",
            FailureReason::Panicked { .. } => "panicked",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FailureReason::Timeout { .. })
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Timeout { after_ms } => write!(f, "timed out after {}ms", after_ms),
            FailureReason::Transport { detail } => write!(f, "transport error: {}", detail),
            FailureReason::InvalidResponse { detail } => write!(f, "invalid response: {}", detail),
            FailureReason::Cancelled => write!(f, "cancelled"),
            FailureReason::Panicked { detail } => write!(f, "attempt panicked: {}", detail),
        }
    }
}

/// State of an attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Pending,
    Success(String),
    Failure(FailureReason),
}

impl AttemptOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, AttemptOutcome::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success(_))
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            AttemptOutcome::Failure(reason) => Some(reason),
            _ => None,
        }
    }
}

/// The bounded execution of one source within one race (Entity)
///
/// Created `Pending` when the coordinator launches the source and moved to a
/// terminal outcome exactly once. Later completions are refused.
#[derive(Debug, Clone)]
pub struct Attempt {
    source: SourceName,
    index: usize,
    started_at: Instant,
    deadline: Instant,
    finished_at: Option<Instant>,
    outcome: AttemptOutcome,
}

impl Attempt {
    /// Start a pending attempt for the source at `index` in the race's source order.
    pub fn start(source: SourceName, index: usize, started_at: Instant, timeout: Duration) -> Self {
        Self {
            source,
            index,
            started_at,
            deadline: started_at + timeout,
            finished_at: None,
            outcome: AttemptOutcome::Pending,
        }
    }

    /// Move the attempt to a terminal outcome.
    ///
    /// Returns `false` (and leaves the attempt untouched) when the attempt is
    /// already terminal or when `outcome` is itself `Pending`.
    pub fn complete(&mut self, outcome: AttemptOutcome, at: Instant) -> bool {
        if !self.outcome.is_pending() || outcome.is_pending() {
            return false;
        }
        self.outcome = outcome;
        self.finished_at = Some(at);
        true
    }

    pub fn succeed(&mut self, payload: impl Into<String>, at: Instant) -> bool {
        self.complete(AttemptOutcome::Success(payload.into()), at)
    }

    pub fn fail(&mut self, reason: FailureReason, at: Instant) -> bool {
        self.complete(AttemptOutcome::Failure(reason), at)
    }

    pub fn source(&self) -> &SourceName {
        &self.source
    }

    /// Position of the source in the race's source order
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn outcome(&self) -> &AttemptOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> AttemptOutcome {
        self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn is_terminal(&self) -> bool {
        !self.outcome.is_pending()
    }

    /// Time between start and completion, `None` while pending
    pub fn elapsed(&self) -> Option<Duration> {
        self.finished_at
            .map(|end| end.saturating_duration_since(self.started_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt() -> Attempt {
        Attempt::start(
            SourceName::try_new("viacep").unwrap(),
            0,
            Instant::now(),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_deadline_is_start_plus_timeout() {
        let a = attempt();
        assert_eq!(a.deadline() - a.started_at(), Duration::from_secs(1));
        assert!(a.outcome().is_pending());
        assert!(a.elapsed().is_none());
    }

    #[test]
    fn test_completes_exactly_once() {
        let mut a = attempt();
        let now = Instant::now();
        assert!(a.succeed("{}", now));
        assert!(!a.fail(FailureReason::Cancelled, now));
        assert_eq!(a.outcome(), &AttemptOutcome::Success("{}".to_string()));
        assert!(a.elapsed().is_some());
    }

    #[test]
    fn test_pending_is_not_a_completion() {
        let mut a = attempt();
        assert!(!a.complete(AttemptOutcome::Pending, Instant::now()));
        assert!(!a.is_terminal());
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(
            FailureReason::timeout(Duration::from_secs(1)).to_string(),
            "timed out after 1000ms"
        );
        assert_eq!(
            FailureReason::transport("connection refused").to_string(),
            "transport error: connection refused"
        );
        assert_eq!(FailureReason::Cancelled.kind(), "cancelled");
    }

    #[test]
    fn test_failure_reason_serializes_with_kind_tag() {
        let json = serde_json::to_value(FailureReason::timeout(Duration::from_millis(250))).unwrap();
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["after_ms"], 250);

        let json = serde_json::to_value(FailureReason::invalid_response("not json")).unwrap();
        assert_eq!(json["kind"], "invalid_response");
        assert_eq!(json["detail"], "not json");
    }
}
