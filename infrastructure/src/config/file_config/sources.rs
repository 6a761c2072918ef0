//! Source entries from TOML (`[[sources]]` array)

use serde::{Deserialize, Serialize};

/// One HTTP source to race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSourceConfig {
    /// Unique name, reported as the winner or in the failure breakdown
    pub name: String,
    /// URL template; `{key}` is replaced by the percent-encoded key
    pub url: String,
    /// Require a JSON body that is not an `{"erro": true}` document
    #[serde(default = "default_expect_json")]
    pub expect_json: bool,
}

fn default_expect_json() -> bool {
    true
}

impl FileSourceConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            expect_json: true,
        }
    }

    /// The two public Brazilian postal-code services
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("viacep", "https://viacep.com.br/ws/{key}/json"),
            Self::new("brasilapi", "https://brasilapi.com.br/api/cep/v1/{key}"),
        ]
    }

    pub fn has_key_placeholder(&self) -> bool {
        self.url.contains("{key}")
    }

    /// Parse a `NAME=URL` command-line argument
    pub fn parse_arg(arg: &str) -> Result<Self, String> {
        let (name, url) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=URL, got '{}'", arg))?;
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() {
            return Err(format!("missing source name in '{}'", arg));
        }
        if url.is_empty() {
            return Err(format!("missing URL for source '{}'", name));
        }
        Ok(Self::new(name, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_json_defaults_to_true() {
        let source: FileSourceConfig =
            toml::from_str("name = \"x\"\nurl = \"http://x/{key}\"").unwrap();
        assert!(source.expect_json);
    }

    #[test]
    fn test_parse_arg() {
        let source = FileSourceConfig::parse_arg("local=http://localhost/?q={key}&a=b").unwrap();
        assert_eq!(source.name, "local");
        assert_eq!(source.url, "http://localhost/?q={key}&a=b");
        assert!(source.has_key_placeholder());

        assert!(FileSourceConfig::parse_arg("no-equals").is_err());
        assert!(FileSourceConfig::parse_arg("=http://x").is_err());
        assert!(FileSourceConfig::parse_arg("x=").is_err());
    }
}
