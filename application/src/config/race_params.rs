//! Race parameters.
//!
//! [`RaceParams`] groups the static knobs of one race invocation. There is
//! no race-wide deadline: each attempt owns its own, and a
//! caller wanting an overall bound wraps the race in `tokio::time::timeout`.

use responder_domain::TieBreak;
use std::time::Duration;

/// Per-attempt budget used when nothing else is configured.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceParams {
    /// Deadline for each attempt, measured from its own start. Must be > 0.
    pub timeout: Duration,
    /// Rule for choosing among successes that are ready at the same instant.
    pub tie_break: TieBreak,
}

impl Default for RaceParams {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ATTEMPT_TIMEOUT,
            tie_break: TieBreak::default(),
        }
    }
}

impl RaceParams {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_timeout_ms(self, millis: u64) -> Self {
        self.with_timeout(Duration::from_millis(millis))
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// A zero timeout would fail every attempt before it starts.
    pub fn is_valid(&self) -> bool {
        !self.timeout.is_zero()
    }
}
