//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod output;
mod race;
mod sources;

pub use output::FileOutputConfig;
pub use race::FileRaceConfig;
pub use sources::FileSourceConfig;

use responder_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Race settings
    pub race: FileRaceConfig,
    /// Sources to race, in tie-break order
    pub sources: Vec<FileSourceConfig>,
    /// Output settings
    pub output: FileOutputConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            race: FileRaceConfig::default(),
            sources: FileSourceConfig::defaults(),
            output: FileOutputConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.race.to_race_params().1);

        if self.sources.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoSources,
                "no sources configured; add a [[sources]] entry or pass --source",
            ));
        }

        let mut seen = HashSet::new();
        for (position, source) in self.sources.iter().enumerate() {
            let name = source.name.trim();
            if name.is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptySourceName { position },
                    format!("sources[{}]: name cannot be empty", position),
                ));
                continue;
            }
            if !seen.insert(name.to_string()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateSourceName {
                        name: name.to_string(),
                    },
                    format!("sources: '{}' is configured more than once", name),
                ));
            }
            if !source.has_key_placeholder() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::MissingKeyPlaceholder {
                        name: name.to_string(),
                    },
                    format!(
                        "sources.{}: url has no {{key}} placeholder; the key will be appended",
                        name
                    ),
                ));
            }
        }

        issues
    }
}
