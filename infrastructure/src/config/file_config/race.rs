//! Race configuration from TOML (`[race]` section)

use responder_application::{DEFAULT_ATTEMPT_TIMEOUT, RaceParams};
use responder_domain::{ConfigIssue, ConfigIssueCode, TieBreak};
use serde::{Deserialize, Serialize};

/// Raw race configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRaceConfig {
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Rule for successes that complete together
    pub tie_break: String,
}

impl Default for FileRaceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ATTEMPT_TIMEOUT.as_millis() as u64,
            tie_break: "lowest_index".to_string(),
        }
    }
}

impl FileRaceConfig {
    /// Parse tie_break string into TieBreak enum
    ///
    /// Accepts: "lowest_index", "lowest", "first"
    pub fn parse_tie_break(&self) -> (TieBreak, Vec<ConfigIssue>) {
        match self.tie_break.to_lowercase().as_str() {
            "lowest_index" | "lowest" | "first" => (TieBreak::LowestIndex, vec![]),
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "race.tie_break".to_string(),
                        value: self.tie_break.clone(),
                        valid_values: vec!["lowest_index".to_string()],
                    },
                    format!(
                        "race.tie_break: unknown value '{}', falling back to 'lowest_index'",
                        self.tie_break
                    ),
                );
                (TieBreak::default(), vec![issue])
            }
        }
    }

    /// Convert to application-layer [`RaceParams`], along with any issues.
    ///
    /// A zero timeout is passed through unchanged and reported as an error.
    pub fn to_race_params(&self) -> (RaceParams, Vec<ConfigIssue>) {
        let (tie_break, mut issues) = self.parse_tie_break();
        if self.timeout_ms == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "race.timeout_ms cannot be 0",
            ));
        }
        let params = RaceParams::default()
            .with_timeout_ms(self.timeout_ms)
            .with_tie_break(tie_break);
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_timeout_is_one_second() {
        let (params, issues) = FileRaceConfig::default().to_race_params();
        assert_eq!(params.timeout, Duration::from_secs(1));
        assert_eq!(params.tie_break, TieBreak::LowestIndex);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unknown_tie_break_falls_back_with_warning() {
        let config = FileRaceConfig {
            tie_break: "random".to_string(),
            ..Default::default()
        };
        let (tie_break, issues) = config.parse_tie_break();
        assert_eq!(tie_break, TieBreak::LowestIndex);
        assert_eq!(issues.len(), 1);
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn test_zero_timeout_is_an_error() {
        let config = FileRaceConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        let (params, issues) = config.to_race_params();
        assert!(!params.is_valid());
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroTimeout);
    }
}
