//! Race domain - attempts, outcomes and the rules that turn them into one result.
//!
//! - [`attempt`] - one source's bounded execution and its terminal outcome
//! - [`result`] - the two shapes a finished race can take
//! - [`aggregator`] - counting terminal outcomes until the source set is exhausted
//! - [`tie_break`] - picking one winner among simultaneously visible successes

pub mod aggregator;
pub mod attempt;
pub mod result;
pub mod tie_break;
