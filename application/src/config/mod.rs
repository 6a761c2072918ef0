//! Application configuration
//!
//! - [`RaceParams`]: per-race tuning (attempt timeout, tie-break rule)
//! - [`SourceRegistry`]: the ordered set of named sources to race

mod race_params;
mod source_registry;

pub use race_params::{DEFAULT_ATTEMPT_TIMEOUT, RaceParams};
pub use source_registry::{RegisteredSource, SourceRegistry};
