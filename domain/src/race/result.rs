//! Race result value objects - the two terminal shapes of a race.
//!
//! - [`RaceWin`] - the single winning source and its raw payload
//! - [`RaceFailure`] - every source's failure reason, in completion order

use super::attempt::FailureReason;
use crate::core::source_name::SourceName;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The winner of a race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceWin {
    /// Source that produced the payload
    pub winner: SourceName,
    /// Raw response, exactly as the source returned it
    pub payload: String,
    /// Time from race start until the winner was chosen
    pub elapsed_ms: u64,
    /// Terminal outcomes the coordinator had seen when it picked the winner
    pub attempts_observed: usize,
}

impl RaceWin {
    pub fn new(winner: SourceName, payload: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            winner,
            payload: payload.into(),
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            attempts_observed: 1,
        }
    }

    pub fn with_attempts_observed(mut self, observed: usize) -> Self {
        self.attempts_observed = observed;
        self
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

/// One source's failure inside an aggregate failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: SourceName,
    pub reason: FailureReason,
}

impl SourceFailure {
    pub fn new(source: SourceName, reason: FailureReason) -> Self {
        Self { source, reason }
    }
}

/// Aggregate failure: no source produced a payload
///
/// Holds exactly one entry per source, ordered by when each failure was
/// observed (not by registration order).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RaceFailure {
    pub attempts: Vec<SourceFailure>,
}

impl RaceFailure {
    pub fn new(attempts: Vec<SourceFailure>) -> Self {
        Self { attempts }
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Failure reason reported for a given source
    pub fn reason_for(&self, source: &str) -> Option<&FailureReason> {
        self.attempts
            .iter()
            .find(|f| f.source.as_str() == source)
            .map(|f| &f.reason)
    }

    /// True when every source failed by running out of time
    pub fn all_timed_out(&self) -> bool {
        !self.attempts.is_empty() && self.attempts.iter().all(|f| f.reason.is_timeout())
    }

    /// Multi-line, per-source breakdown
    pub fn breakdown(&self) -> String {
        self.attempts
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{}. {}: {}", i + 1, f.source, f.reason))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for RaceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "all {} sources failed", self.attempts.len())?;
        for failure in &self.attempts {
            write!(f, "; {}: {}", failure.source, failure.reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> SourceName {
        SourceName::try_new(s).unwrap()
    }

    fn failure() -> RaceFailure {
        RaceFailure::new(vec![
            SourceFailure::new(name("b"), FailureReason::timeout(Duration::from_secs(1))),
            SourceFailure::new(name("a"), FailureReason::transport("connection reset")),
        ])
    }

    #[test]
    fn test_display_lists_every_source() {
        assert_eq!(
            failure().to_string(),
            "all 2 sources failed; b: timed out after 1000ms; a: transport error: connection reset"
        );
    }

    #[test]
    fn test_breakdown_keeps_completion_order() {
        let breakdown = failure().breakdown();
        let lines: Vec<_> = breakdown.lines().collect();
        assert_eq!(lines[0], "1. b: timed out after 1000ms");
        assert_eq!(lines[1], "2. a: transport error: connection reset");
    }

    #[test]
    fn test_reason_lookup() {
        let f = failure();
        assert!(f.reason_for("b").unwrap().is_timeout());
        assert!(f.reason_for("c").is_none());
        assert!(!f.all_timed_out());
    }

    #[test]
    fn test_win_elapsed_roundtrip() {
        let win = RaceWin::new(name("viacep"), "{\"cep\":\"01153-000\"}", Duration::from_millis(42))
            .with_attempts_observed(2);
        assert_eq!(win.elapsed(), Duration::from_millis(42));
        assert_eq!(win.attempts_observed, 2);

        let json = serde_json::to_value(&win).unwrap();
        assert_eq!(json["winner"], "viacep");
        assert_eq!(json["elapsed_ms"], 42);
    }
}
