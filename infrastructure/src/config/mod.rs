//! Configuration file loading for first-responder
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FIRST_RESPONDER_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./responder.toml` or `./.responder.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/first-responder/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileOutputConfig, FileRaceConfig, FileSourceConfig};
pub use loader::{ConfigError, ConfigLoader};
