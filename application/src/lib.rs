//! Application layer for first-responder
//!
//! This crate contains the race use case, port definitions, the source
//! registry and race parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_ATTEMPT_TIMEOUT, RaceParams, RegisteredSource, SourceRegistry};
pub use ports::{
    progress::{NoProgress, RaceProgressNotifier},
    query_source::{FnSource, QuerySource, SourceError},
};
pub use use_cases::run_attempt::AttemptRunner;
pub use use_cases::run_race::{RaceError, RunRaceInput, RunRaceUseCase, race};
