//! Source Registry
//!
//! The [`SourceRegistry`] is the ordered set of named sources a race runs
//! against. It is a pure configuration holder: it enforces name uniqueness
//! and remembers registration order (which is also the tie-break order),
//! but never calls a source itself.
//!
//! # Usage
//!
//! ```ignore
//! use responder_application::{SourceRegistry, SourceError};
//!
//! let mut registry = SourceRegistry::new();
//! registry.register("viacep", viacep_client)?;
//! registry.register_fn("static", |key, _deadline| async move {
//!     Ok::<_, SourceError>(format!("{{\"cep\":\"{}\"}}", key))
//! })?;
//!
//! assert_eq!(registry.names(), vec!["viacep", "static"]);
//! ```

use crate::ports::query_source::{FnSource, QuerySource, SourceError};
use responder_domain::{DomainError, QueryKey, SourceName};
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;

/// A source bound to its registry name
#[derive(Clone)]
pub struct RegisteredSource {
    name: SourceName,
    source: Arc<dyn QuerySource>,
}

impl RegisteredSource {
    pub fn new(name: SourceName, source: Arc<dyn QuerySource>) -> Self {
        Self { name, source }
    }

    pub fn name(&self) -> &SourceName {
        &self.name
    }

    pub fn source(&self) -> &Arc<dyn QuerySource> {
        &self.source
    }

    /// Invoke the underlying source
    pub async fn invoke(&self, key: &QueryKey, deadline: Instant) -> Result<String, SourceError> {
        self.source.invoke(key, deadline).await
    }
}

impl std::fmt::Debug for RegisteredSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of uniquely named sources
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<RegisteredSource>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under `name`.
    ///
    /// Fails with [`DomainError::DuplicateSource`] if the name is taken; the
    /// registry is left unchanged in that case.
    pub fn register<S: QuerySource + 'static>(
        &mut self,
        name: impl Into<String>,
        source: S,
    ) -> Result<&mut Self, DomainError> {
        self.register_arc(name, Arc::new(source))
    }

    /// Register a source (Arc version)
    pub fn register_arc(
        &mut self,
        name: impl Into<String>,
        source: Arc<dyn QuerySource>,
    ) -> Result<&mut Self, DomainError> {
        let name = SourceName::try_new(name)?;
        if self.contains(name.as_str()) {
            return Err(DomainError::DuplicateSource(name.into()));
        }
        self.sources.push(RegisteredSource::new(name, source));
        Ok(self)
    }

    /// Register a plain async closure as a source
    pub fn register_fn<F, Fut>(
        &mut self,
        name: impl Into<String>,
        f: F,
    ) -> Result<&mut Self, DomainError>
    where
        F: Fn(QueryKey, Instant) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, SourceError>> + Send + 'static,
    {
        self.register(name, FnSource::new(f))
    }

    /// Sources in registration order
    pub fn sources(&self) -> &[RegisteredSource] {
        &self.sources
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name().as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredSource> {
        self.sources.iter().find(|s| s.name().as_str() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_source(
        payload: &'static str,
    ) -> impl Fn(QueryKey, Instant) -> std::future::Ready<Result<String, SourceError>> {
        move |_key, _deadline| std::future::ready(Ok(payload.to_string()))
    }

    #[test]
    fn test_keeps_registration_order() {
        let mut registry = SourceRegistry::new();
        registry
            .register_fn("viacep", ok_source("a"))
            .unwrap()
            .register_fn("brasilapi", ok_source("b"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["viacep", "brasilapi"]);
    }

    #[test]
    fn test_duplicate_name_is_rejected_and_registry_unchanged() {
        let mut registry = SourceRegistry::new();
        registry.register_fn("viacep", ok_source("first")).unwrap();

        let err = registry.register_fn("viacep", ok_source("second")).unwrap_err();
        assert_eq!(err, DomainError::DuplicateSource("viacep".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_detection_uses_trimmed_name() {
        let mut registry = SourceRegistry::new();
        registry.register_fn("viacep", ok_source("a")).unwrap();
        assert!(registry.register_fn(" viacep ", ok_source("b")).is_err());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut registry = SourceRegistry::new();
        assert!(matches!(
            registry.register_fn("  ", ok_source("a")),
            Err(DomainError::InvalidSourceName(_))
        ));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_first_registered_source_is_kept_on_collision() {
        let mut registry = SourceRegistry::new();
        registry.register_fn("dup", ok_source("first")).unwrap();
        let _ = registry.register_fn("dup", ok_source("second"));

        let key = QueryKey::try_new("01153000").unwrap();
        let payload = registry
            .get("dup")
            .unwrap()
            .invoke(&key, Instant::now())
            .await
            .unwrap();
        assert_eq!(payload, "first");
    }
}
