//! Console output formatter for race results

use colored::Colorize;
use responder_domain::{RaceFailure, RaceWin};
use serde_json::json;

/// Formats race outcomes for the terminal
#[derive(Debug, Clone, Copy)]
pub struct ConsoleFormatter {
    color: bool,
    strip_newlines: bool,
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self {
            color: true,
            strip_newlines: true,
        }
    }
}

impl ConsoleFormatter {
    pub fn new(color: bool, strip_newlines: bool) -> Self {
        Self {
            color,
            strip_newlines,
        }
    }

    /// `<source>: <payload>`
    pub fn format_win(&self, win: &RaceWin) -> String {
        let payload = if self.strip_newlines {
            strip_newlines(&win.payload)
        } else {
            win.payload.clone()
        };
        let name = if self.color {
            win.winner.as_str().cyan().bold().to_string()
        } else {
            win.winner.to_string()
        };
        format!("{}: {}", name, payload)
    }

    /// Header plus one line per source and its reason
    pub fn format_failure(&self, failure: &RaceFailure) -> String {
        let header = format!("All {} sources failed:", failure.len());
        let mut output = if self.color {
            header.red().bold().to_string()
        } else {
            header
        };

        for attempt in &failure.attempts {
            let name = if self.color {
                attempt.source.as_str().yellow().to_string()
            } else {
                attempt.source.to_string()
            };
            output.push_str(&format!("\n  {}: {}", name, attempt.reason));
        }
        output
    }

    /// Format a win as JSON
    pub fn format_json_win(win: &RaceWin) -> String {
        let value = json!({
            "winner": win.winner.as_str(),
            "payload": win.payload,
            "elapsed_ms": win.elapsed_ms,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format an aggregate failure as JSON
    pub fn format_json_failure(failure: &RaceFailure) -> String {
        let attempts: Vec<_> = failure
            .attempts
            .iter()
            .map(|a| {
                json!({
                    "source": a.source.as_str(),
                    "kind": a.reason.kind(),
                    "reason": a.reason.to_string(),
                })
            })
            .collect();
        let value = json!({
            "error": "all_sources_failed",
            "attempts": attempts,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

fn strip_newlines(payload: &str) -> String {
    payload.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use responder_domain::{FailureReason, SourceFailure, SourceName};
    use std::time::Duration;

    fn name(s: &str) -> SourceName {
        SourceName::try_new(s).unwrap()
    }

    fn win() -> RaceWin {
        RaceWin::new(
            name("brasilapi"),
            "{\n  \"cep\": \"01153000\"\r\n}",
            Duration::from_millis(42),
        )
    }

    fn failure() -> RaceFailure {
        RaceFailure::new(vec![
            SourceFailure::new(name("viacep"), FailureReason::timeout(Duration::from_secs(1))),
            SourceFailure::new(name("brasilapi"), FailureReason::transport("HTTP 500 Internal Server Error")),
        ])
    }

    #[test]
    fn test_format_win_strips_newlines() {
        let out = ConsoleFormatter::new(false, true).format_win(&win());
        assert_eq!(out, "brasilapi: {  \"cep\": \"01153000\"}");
    }

    #[test]
    fn test_format_win_raw_keeps_newlines() {
        let out = ConsoleFormatter::new(false, false).format_win(&win());
        assert!(out.contains('\n'));
        assert!(out.starts_with("brasilapi: {"));
    }

    #[test]
    fn test_format_failure_lists_every_source() {
        let out = ConsoleFormatter::new(false, true).format_failure(&failure());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "All 2 sources failed:");
        assert_eq!(lines[1], "  viacep: timed out after 1000ms");
        assert_eq!(lines[2], "  brasilapi: transport error: HTTP 500 Internal Server Error");
    }

    #[test]
    fn test_format_json_win() {
        let out = ConsoleFormatter::format_json_win(&win());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["winner"], "brasilapi");
        assert_eq!(value["elapsed_ms"], 42);
    }

    #[test]
    fn test_format_json_failure() {
        let out = ConsoleFormatter::format_json_failure(&failure());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["error"], "all_sources_failed");
        assert_eq!(value["attempts"][0]["source"], "viacep");
        assert_eq!(value["attempts"][0]["kind"], "timeout");
        assert_eq!(value["attempts"][1]["reason"], "transport error: HTTP 500 Internal Server Error");
    }
}
