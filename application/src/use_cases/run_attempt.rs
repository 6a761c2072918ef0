//! Attempt Runner
//!
//! Runs one source under its own deadline and turns whatever happens into a
//! terminal [`Attempt`]. Nothing escapes as an error or a panic: timeouts,
//! transport failures, cancellation and panics all become a
//! [`FailureReason`].
//!
//! When the deadline passes first, the source's future is dropped. Whether
//! that actually stops the underlying network call depends on the source;
//! the runner only guarantees that its result is never looked at.

use crate::config::RegisteredSource;
use futures::FutureExt;
use responder_domain::{Attempt, AttemptOutcome, FailureReason, QueryKey};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs single attempts with a fixed per-attempt budget
#[derive(Debug, Clone)]
pub struct AttemptRunner {
    timeout: Duration,
    cancel: CancellationToken,
}

impl AttemptRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop waiting on the source as soon as `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `source` for `key` and return only the terminal outcome
    pub async fn run(&self, source: &RegisteredSource, key: &QueryKey) -> AttemptOutcome {
        self.run_indexed(source, 0, key).await.into_outcome()
    }

    /// Run `source` for `key` as the attempt at position `index` of a race
    pub async fn run_indexed(
        &self,
        source: &RegisteredSource,
        index: usize,
        key: &QueryKey,
    ) -> Attempt {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut attempt = Attempt::start(
            source.name().clone(),
            index,
            started.into_std(),
            self.timeout,
        );

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => AttemptOutcome::Failure(FailureReason::Cancelled),
            result = tokio::time::timeout_at(deadline, source.invoke(key, deadline)) => match result {
                Ok(Ok(payload)) => AttemptOutcome::Success(payload),
                Ok(Err(e)) => AttemptOutcome::Failure(e.into_reason(started.elapsed())),
                Err(_) => AttemptOutcome::Failure(FailureReason::timeout(self.timeout)),
            },
        };

        attempt.complete(outcome, Instant::now().into_std());

        match attempt.outcome() {
            AttemptOutcome::Success(payload) => debug!(
                "Source {} succeeded in {:?} ({} bytes)",
                source.name(),
                started.elapsed(),
                payload.len()
            ),
            AttemptOutcome::Failure(reason) => debug!(
                "Source {} failed in {:?}: {}",
                source.name(),
                started.elapsed(),
                reason
            ),
            AttemptOutcome::Pending => {}
        }

        attempt
    }

    /// Like [`run_indexed`](Self::run_indexed), but a panicking source is
    /// reported as [`FailureReason::Panicked`] instead of unwinding.
    pub async fn run_guarded(
        &self,
        source: &RegisteredSource,
        index: usize,
        key: &QueryKey,
    ) -> Attempt {
        let started = Instant::now();
        match AssertUnwindSafe(self.run_indexed(source, index, key))
            .catch_unwind()
            .await
        {
            Ok(attempt) => attempt,
            Err(panic) => {
                let mut attempt = Attempt::start(
                    source.name().clone(),
                    index,
                    started.into_std(),
                    self.timeout,
                );
                attempt.fail(
                    FailureReason::panicked(panic_message(&*panic)),
                    Instant::now().into_std(),
                );
                attempt
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::query_source::{FnSource, SourceError};
    use responder_domain::SourceName;
    use std::sync::Arc;

    fn source<F, Fut>(name: &str, f: F) -> RegisteredSource
    where
        F: Fn(QueryKey, Instant) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<String, SourceError>> + Send + 'static,
    {
        RegisteredSource::new(SourceName::try_new(name).unwrap(), Arc::new(FnSource::new(f)))
    }

    fn key() -> QueryKey {
        QueryKey::try_new("01153000").unwrap()
    }

    #[tokio::test]
    async fn test_success_carries_payload() {
        let src = source("viacep", |key, _| async move {
            Ok::<_, SourceError>(format!("{{\"cep\":\"{}\"}}", key))
        });
        let outcome = AttemptRunner::new(Duration::from_secs(1)).run(&src, &key()).await;
        assert_eq!(
            outcome,
            AttemptOutcome::Success("{\"cep\":\"01153000\"}".to_string())
        );
    }

    #[tokio::test]
    async fn test_slow_source_times_out_at_deadline() {
        let src = source("slow", |_, _| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, SourceError>("late".to_string())
        });
        let runner = AttemptRunner::new(Duration::from_millis(100));

        let started = std::time::Instant::now();
        let attempt = runner.run_indexed(&src, 3, &key()).await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(attempt.index(), 3);
        assert_eq!(
            attempt.outcome(),
            &AttemptOutcome::Failure(FailureReason::timeout(Duration::from_millis(100)))
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_mapped() {
        let src = source("down", |_, _| async {
            Err::<String, _>(SourceError::Transport("connection refused".to_string()))
        });
        let outcome = AttemptRunner::new(Duration::from_secs(1)).run(&src, &key()).await;
        assert_eq!(
            outcome.failure_reason(),
            Some(&FailureReason::transport("connection refused"))
        );
    }

    #[tokio::test]
    async fn test_source_reported_timeout_records_actual_time() {
        let src = source("gave-up", |_, _| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<String, _>(SourceError::Timeout)
        });
        let outcome = AttemptRunner::new(Duration::from_millis(750)).run(&src, &key()).await;

        match outcome.failure_reason() {
            Some(FailureReason::Timeout { after_ms }) => {
                assert!(*after_ms >= 10, "after_ms = {}", after_ms);
                assert!(*after_ms < 750, "after_ms = {}", after_ms);
            }
            other => panic!("expected a timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_waiting() {
        let src = source("hang", |_, _| async {
            std::future::pending::<()>().await;
            Ok::<_, SourceError>(String::new())
        });
        let token = CancellationToken::new();
        token.cancel();

        let runner = AttemptRunner::new(Duration::from_secs(30)).with_cancellation(token);
        let outcome = runner.run(&src, &key()).await;
        assert_eq!(outcome.failure_reason(), Some(&FailureReason::Cancelled));
    }

    #[tokio::test]
    async fn test_panic_becomes_failure() {
        let src = source("broken", |_, _| async {
            if true {
                panic!("parser exploded");
            }
            Ok::<_, SourceError>(String::new())
        });
        let attempt = AttemptRunner::new(Duration::from_secs(1))
            .run_guarded(&src, 1, &key())
            .await;

        assert_eq!(attempt.source().as_str(), "broken");
        assert_eq!(
            attempt.outcome().failure_reason(),
            Some(&FailureReason::panicked("parser exploded"))
        );
    }
}
