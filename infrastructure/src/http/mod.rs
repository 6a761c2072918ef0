//! HTTP-backed query sources
//!
//! [`HttpQuerySource`] queries a REST endpoint built from a URL template,
//! e.g. `https://viacep.com.br/ws/{key}/json`. [`build_http_registry`] turns
//! the `[[sources]]` section of the config file into a ready-to-race
//! [`SourceRegistry`].

mod source;

pub use source::{HttpQuerySource, KEY_PLACEHOLDER, validate_json_payload};

use crate::config::FileSourceConfig;
use responder_application::SourceRegistry;
use responder_domain::DomainError;
use tracing::debug;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("first-responder/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used by every source
pub fn default_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}

/// Register one [`HttpQuerySource`] per configured source, in file order.
///
/// Fails on the first blank or duplicate name.
pub fn build_http_registry(
    sources: &[FileSourceConfig],
    client: &reqwest::Client,
) -> Result<SourceRegistry, DomainError> {
    let mut registry = SourceRegistry::new();
    for source in sources {
        debug!("Registering source {} -> {}", source.name, source.url);
        registry.register(
            source.name.as_str(),
            HttpQuerySource::new(source.url.as_str(), client.clone())
                .with_expect_json(source.expect_json),
        )?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, url: &str) -> FileSourceConfig {
        FileSourceConfig {
            name: name.to_string(),
            url: url.to_string(),
            expect_json: true,
        }
    }

    #[test]
    fn test_builds_registry_in_file_order() {
        let client = default_client().unwrap();
        let registry = build_http_registry(
            &[
                entry("viacep", "https://viacep.com.br/ws/{key}/json"),
                entry("brasilapi", "https://brasilapi.com.br/api/cep/v1/{key}"),
            ],
            &client,
        )
        .unwrap();
        assert_eq!(registry.names(), vec!["viacep", "brasilapi"]);
    }

    #[test]
    fn test_duplicate_names_fail() {
        let client = default_client().unwrap();
        let err = build_http_registry(
            &[entry("a", "http://x/{key}"), entry("a", "http://y/{key}")],
            &client,
        )
        .unwrap_err();
        assert_eq!(err, DomainError::DuplicateSource("a".to_string()));
    }

    #[test]
    fn test_user_agent_names_the_tool() {
        assert!(USER_AGENT.starts_with("first-responder/"));
    }
}
