//! Query source port
//!
//! Defines the contract every data provider raced by the coordinator must
//! implement. Real network clients live in the infrastructure layer.

use async_trait::async_trait;
use responder_domain::{FailureReason, QueryKey};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Errors a source can report for a single query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl SourceError {
    /// Fold the error into the attempt-level failure taxonomy.
    ///
    /// `elapsed` is how long the attempt ran, reported when the source
    /// itself gave up on the deadline.
    pub fn into_reason(self, elapsed: Duration) -> FailureReason {
        match self {
            SourceError::Transport(detail) => FailureReason::transport(detail),
            SourceError::InvalidResponse(detail) => FailureReason::invalid_response(detail),
            SourceError::Timeout => FailureReason::timeout(elapsed),
        }
    }
}

/// A single, independently callable data provider
///
/// Implementations must be safe to call from several tasks at once. The
/// `deadline` is the instant after which the attempt's result is ignored;
/// well-behaved sources use it to bound their own I/O, but the attempt
/// runner enforces it regardless.
#[async_trait]
pub trait QuerySource: Send + Sync {
    /// Query the source for `key` and return its raw payload
    async fn invoke(&self, key: &QueryKey, deadline: Instant) -> Result<String, SourceError>;
}

/// Adapter turning an async closure into a [`QuerySource`]
pub struct FnSource<F> {
    f: F,
}

impl<F> FnSource<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> QuerySource for FnSource<F>
where
    F: Fn(QueryKey, Instant) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, SourceError>> + Send + 'static,
{
    async fn invoke(&self, key: &QueryKey, deadline: Instant) -> Result<String, SourceError> {
        (self.f)(key.clone(), deadline).await
    }
}
