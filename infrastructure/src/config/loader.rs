//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use responder_domain::{ConfigIssue, Severity};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["responder.toml", ".responder.toml"];

/// Prefix for environment overrides, e.g. `FIRST_RESPONDER_RACE__TIMEOUT_MS=500`
pub const ENV_PREFIX: &str = "FIRST_RESPONDER_";

/// Errors raised while validating a loaded configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `FIRST_RESPONDER_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./responder.toml` or `./.responder.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/first-responder/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                debug!("Merging global config {}", global_path.display());
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(project_path) = Self::project_config_path() {
            debug!("Merging project config {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            debug!("Merging explicit config {}", path.display());
            figment = figment.merge(Toml::file_exact(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load a single file over the defaults, ignoring every other source
    pub fn load_file(path: &Path) -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Toml::file_exact(path))
            .extract()
            .map_err(Box::new)
    }

    /// Validate a loaded configuration, logging warnings and failing on any
    /// error-level issue
    pub fn validate(config: FileConfig) -> Result<FileConfig, ConfigError> {
        let issues = config.validate();
        for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
            warn!("{}", issue.message);
        }
        if ConfigIssue::has_errors(&issues) {
            return Err(ConfigError::Invalid(issues));
        }
        Ok(config)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/first-responder/config.toml if set,
    /// otherwise falls back to ~/.config/first-responder/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("first-responder").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        println!("  [     ] Env:     {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./responder.toml or ./.responder.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
