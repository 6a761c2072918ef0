//! Query key value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The key every source in a race is asked about (Value Object)
///
/// Opaque to the race itself: a postal code, an identifier, a search term.
/// Sources decide how to encode it for their own backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    value: String,
}

impl QueryKey {
    /// Try to create a key, returning an error for blank input
    pub fn try_new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(DomainError::InvalidKey(value))
        } else {
            Ok(Self {
                value: trimmed.to_string(),
            })
        }
    }

    /// Get the key content
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume and return the inner value
    pub fn into_inner(self) -> String {
        self.value
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::str::FromStr for QueryKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_creation() {
        let key = QueryKey::try_new("01153000").unwrap();
        assert_eq!(key.as_str(), "01153000");
        assert_eq!(key.to_string(), "01153000");
    }

    #[test]
    fn test_key_is_trimmed() {
        let key: QueryKey = " 01153000\n".parse().unwrap();
        assert_eq!(key.into_inner(), "01153000");
    }

    #[test]
    fn test_blank_key_rejected() {
        assert!(QueryKey::try_new("").is_err());
        assert!(matches!(
            QueryKey::try_new("  "),
            Err(DomainError::InvalidKey(_))
        ));
    }
}
