//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// All of these are configuration errors: they are raised before any source
/// is contacted and are fatal for the race that was about to start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Source '{0}' is already registered")]
    DuplicateSource(String),

    #[error("Invalid source name: {0:?}")]
    InvalidSourceName(String),

    #[error("Invalid query key: {0:?}")]
    InvalidKey(String),
}

impl DomainError {
    /// Check if this error was caused by the source set itself
    /// (as opposed to the key being queried)
    pub fn is_source_config(&self) -> bool {
        matches!(
            self,
            DomainError::DuplicateSource(_) | DomainError::InvalidSourceName(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_source_display() {
        let error = DomainError::DuplicateSource("viacep".to_string());
        assert_eq!(error.to_string(), "Source 'viacep' is already registered");
    }

    #[test]
    fn test_is_source_config() {
        assert!(DomainError::InvalidSourceName(" ".to_string()).is_source_config());
        assert!(DomainError::DuplicateSource("a".to_string()).is_source_config());
        assert!(!DomainError::InvalidKey(String::new()).is_source_config());
    }
}
