//! Winner selection among successes that become visible together.
//!
//! Two attempts "tie" when both have already completed successfully by the
//! time the coordinator observes the first of them. Scheduling decides which
//! completion the coordinator happens to dequeue first, so the winner is
//! picked by a fixed rule over the ready set instead.

use super::attempt::Attempt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The source registered first (lowest index in the source order) wins
    #[default]
    LowestIndex,
}

impl TieBreak {
    /// Pick the winning attempt among `ready`, ignoring anything that is not
    /// a success. Returns `None` when no candidate succeeded.
    pub fn pick<'a, I>(self, ready: I) -> Option<&'a Attempt>
    where
        I: IntoIterator<Item = &'a Attempt>,
    {
        match self {
            TieBreak::LowestIndex => ready
                .into_iter()
                .filter(|a| a.is_success())
                .min_by_key(|a| a.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureReason, SourceName};
    use std::time::{Duration, Instant};

    fn attempt(name: &str, index: usize, ok: bool) -> Attempt {
        let mut a = Attempt::start(
            SourceName::try_new(name).unwrap(),
            index,
            Instant::now(),
            Duration::from_secs(1),
        );
        if ok {
            a.succeed(name, Instant::now());
        } else {
            a.fail(FailureReason::transport("boom"), Instant::now());
        }
        a
    }

    #[test]
    fn test_lowest_index_wins_regardless_of_arrival() {
        let ready = vec![attempt("b", 1, true), attempt("a", 0, true)];
        let winner = TieBreak::LowestIndex.pick(&ready).unwrap();
        assert_eq!(winner.source().as_str(), "a");
    }

    #[test]
    fn test_failures_never_win() {
        let ready = vec![attempt("a", 0, false), attempt("b", 1, true)];
        let winner = TieBreak::default().pick(&ready).unwrap();
        assert_eq!(winner.source().as_str(), "b");

        let only_failures = vec![attempt("a", 0, false)];
        assert!(TieBreak::LowestIndex.pick(&only_failures).is_none());
    }
}
