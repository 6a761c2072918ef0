//! CLI entrypoint for first-responder
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use responder_application::{RaceError, RunRaceInput, RunRaceUseCase};
use responder_domain::{OutputFormat, QueryKey};
use responder_infrastructure::{
    ConfigLoader, FileConfig, FileSourceConfig, build_http_registry, default_client,
};
use responder_presentation::{Cli, ConsoleFormatter, ProgressMode};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Every source failed
const EXIT_ALL_FAILED: u8 = 1;
/// The configuration or the arguments cannot produce a race
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting first-responder");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        match ConfigLoader::load(cli.config.as_ref()) {
            Ok(config) => config,
            Err(e) => return Ok(config_failure(e)),
        }
    };

    let config = match apply_overrides(config, &cli) {
        Ok(config) => config,
        Err(e) => return Ok(config_failure(e)),
    };
    let config = match ConfigLoader::validate(config) {
        Ok(config) => config,
        Err(e) => return Ok(config_failure(e)),
    };

    let key = match QueryKey::try_new(cli.key.clone().unwrap_or_default()) {
        Ok(key) => key,
        Err(e) => return Ok(config_failure(e)),
    };

    // === Dependency Injection ===
    let client = default_client().context("failed to build HTTP client")?;
    let registry = match build_http_registry(&config.sources, &client) {
        Ok(registry) => registry,
        Err(e) => return Ok(config_failure(e)),
    };
    debug!("Racing sources: {}", registry.names().join(", "));

    let (params, _) = config.race.to_race_params();
    let input = RunRaceInput::new(key).with_params(params);
    let use_case = RunRaceUseCase::new(Arc::new(registry));

    let progress = ProgressMode::select(cli.quiet, std::io::stderr().is_terminal()).notifier();

    let formatter = ConsoleFormatter::new(config.output.color, config.output.strip_newlines);
    let json = config.output.format == OutputFormat::Json;

    match use_case.execute_with_progress(input, progress.as_ref()).await {
        Ok(win) => {
            if json {
                println!("{}", ConsoleFormatter::format_json_win(&win));
            } else {
                println!("{}", formatter.format_win(&win));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(RaceError::AllSourcesFailed(failure)) => {
            if json {
                println!("{}", ConsoleFormatter::format_json_failure(&failure));
            } else {
                eprintln!("{}", formatter.format_failure(&failure));
            }
            Ok(ExitCode::from(EXIT_ALL_FAILED))
        }
        Err(e) => Ok(config_failure(e)),
    }
}

/// Apply command-line flags on top of the loaded configuration
fn apply_overrides(mut config: FileConfig, cli: &Cli) -> Result<FileConfig, String> {
    if let Some(timeout_ms) = cli.timeout_ms {
        config.race.timeout_ms = timeout_ms;
    }

    if !cli.source.is_empty() {
        config.sources = cli
            .source
            .iter()
            .map(|arg| FileSourceConfig::parse_arg(arg))
            .collect::<Result<Vec<_>, _>>()?;
    }

    if let Some(format) = cli.output {
        config.output.format = format.into();
    }

    if cli.raw {
        config.output.strip_newlines = false;
    }

    Ok(config)
}

fn config_failure(err: impl std::fmt::Display) -> ExitCode {
    eprintln!("error: {}", err);
    ExitCode::from(EXIT_CONFIG)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["first-responder"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let config = apply_overrides(FileConfig::default(), &cli(&["01153000"])).unwrap();
        assert_eq!(config.race.timeout_ms, 1000);
        assert_eq!(config.sources.len(), 2);
        assert!(config.output.strip_newlines);
    }

    #[test]
    fn test_source_flags_replace_configured_sources() {
        let config = apply_overrides(
            FileConfig::default(),
            &cli(&["-s", "local=http://127.0.0.1:8080/{key}", "--timeout-ms", "50", "--raw", "x"]),
        )
        .unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].name, "local");
        assert_eq!(config.race.timeout_ms, 50);
        assert!(!config.output.strip_newlines);
    }

    #[test]
    fn test_malformed_source_flag_is_rejected() {
        assert!(apply_overrides(FileConfig::default(), &cli(&["-s", "nope", "x"])).is_err());
    }

    #[test]
    fn test_output_flag_overrides_format() {
        let config = apply_overrides(FileConfig::default(), &cli(&["-o", "json", "x"])).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
    }
}
