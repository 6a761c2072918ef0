//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod run_attempt;
pub mod run_race;
