//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for race results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `<source>: <payload>` on one line
    Text,
    /// JSON object
    Json,
}

impl From<OutputFormat> for responder_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => responder_domain::OutputFormat::Text,
            OutputFormat::Json => responder_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for first-responder
#[derive(Parser, Debug)]
#[command(name = "first-responder")]
#[command(author, version, about = "Query several sources at once and keep the first answer")]
#[command(long_about = r#"
first-responder sends the same lookup to every configured source at the same
time, prints the first successful answer and abandons the rest.

Each source gets its own timeout (1000ms unless configured). If every source
fails, each one's reason is printed and the exit code is 1.

Configuration files are loaded from (in priority order):
1. FIRST_RESPONDER_* environment variables
2. --config <path>       Explicit config file
3. ./responder.toml      Project-level config
4. ~/.config/first-responder/config.toml   Global config

Example:
  first-responder 01153000
  first-responder --timeout-ms 500 -o json 01153000
  first-responder --source local=http://localhost:8080/cep/{key} 01153000
"#)]
pub struct Cli {
    /// The key to look up (e.g. a postal code)
    #[arg(required_unless_present = "show_config")]
    pub key: Option<String>,

    /// Source to race as NAME=URL; replaces configured sources (repeatable)
    #[arg(short, long, value_name = "NAME=URL")]
    pub source: Vec<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Keep newlines in the winning payload
    #[arg(long)]
    pub raw: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "first-responder",
            "--source",
            "a=http://a/{key}",
            "-s",
            "b=http://b/{key}",
            "--timeout-ms",
            "250",
            "-o",
            "json",
            "-vv",
            "01153000",
        ])
        .unwrap();

        assert_eq!(cli.key.as_deref(), Some("01153000"));
        assert_eq!(cli.source.len(), 2);
        assert_eq!(cli.timeout_ms, Some(250));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_key_required_unless_show_config() {
        assert!(Cli::try_parse_from(["first-responder"]).is_err());
        let cli = Cli::try_parse_from(["first-responder", "--show-config"]).unwrap();
        assert!(cli.key.is_none());
    }
}
