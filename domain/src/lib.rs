//! Domain layer for first-responder
//!
//! This crate contains the core entities, value objects and rules of a race.
//! It has no dependencies on async runtimes, networking or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Race
//!
//! A race queries several redundant sources for the same key at once and keeps
//! the first successful answer:
//!
//! - **Source**: a named, independently callable data provider ([`SourceName`])
//! - **Attempt**: the bounded execution of one source within one race ([`Attempt`])
//! - **Winner**: the first attempt to report success ([`RaceWin`])
//! - **Aggregate failure**: every per-source failure when nobody wins ([`RaceFailure`])
//!
//! The [`ResultAggregator`] counts terminal outcomes so the coordinator always
//! knows when the whole source set is exhausted, and [`TieBreak`] settles
//! successes that become visible at the same instant.

pub mod config;
pub mod core;
pub mod race;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, query_key::QueryKey, source_name::SourceName};
pub use race::{
    aggregator::ResultAggregator,
    attempt::{Attempt, AttemptOutcome, FailureReason},
    result::{RaceFailure, RaceWin, SourceFailure},
    tie_break::TieBreak,
};
