use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::domain::errors::InfrastructureError;

/// Failure of a bounded storage call.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unique constraint `{constraint}` violated")]
    UniqueViolation { constraint: String },

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

/// Timeout and single-retry policy wrapped around every database call.
#[derive(Debug, Clone, Copy)]
pub struct StoragePolicy {
    timeout: Duration,
    backoff: Duration,
}

impl StoragePolicy {
    pub fn new(timeout: Duration, backoff: Duration) -> Self {
        Self { timeout, backoff }
    }

    /// Run `operation`, retrying once after the backoff when the first
    /// attempt timed out or hit a transient driver error.
    ///
    /// The closure is invoked again on retry, so it must be safe to repeat.
    pub async fn run<T, F, Fut>(
        &self,
        name: &'static str,
        operation: F,
    ) -> Result<T, StorageError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        match self.attempt(&operation).await {
            Err(Attempt::Transient(reason)) => {
                tracing::warn!(
                    operation = name,
                    reason = %reason,
                    backoff_ms = self.backoff.as_millis() as u64,
                    "Retrying storage operation"
                );
                tokio::time::sleep(self.backoff).await;
                self.attempt(&operation)
                    .await
                    .map_err(|failure| self.classify(name, failure))
            }
            other => other.map_err(|failure| self.classify(name, failure)),
        }
    }

    async fn attempt<T, F, Fut>(&self, operation: &F) -> Result<T, Attempt>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, operation()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if is_transient(&e) => Err(Attempt::Transient(TransientReason::Driver(e))),
            Ok(Err(e)) => Err(Attempt::Permanent(e)),
            Err(_) => Err(Attempt::Transient(TransientReason::TimedOut)),
        }
    }

    fn classify(&self, name: &'static str, failure: Attempt) -> StorageError {
        match failure {
            Attempt::Transient(TransientReason::TimedOut) => {
                InfrastructureError::Timeout {
                    operation: name,
                    timeout_ms: self.timeout.as_millis() as u64,
                }
                .into()
            }
            Attempt::Transient(TransientReason::Driver(e)) => database_error(name, e),
            Attempt::Permanent(e) => {
                let constraint = e
                    .as_database_error()
                    .filter(|db| db.is_unique_violation())
                    .map(|db| db.constraint().unwrap_or_default().to_string());
                match constraint {
                    Some(constraint) => StorageError::UniqueViolation { constraint },
                    None => database_error(name, e),
                }
            }
        }
    }
}

enum Attempt {
    Transient(TransientReason),
    Permanent(sqlx::Error),
}

enum TransientReason {
    TimedOut,
    Driver(sqlx::Error),
}

impl std::fmt::Display for TransientReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransientReason::TimedOut => f.write_str("timed out"),
            TransientReason::Driver(e) => e.fmt(f),
        }
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
    )
}

fn database_error(name: &'static str, err: sqlx::Error) -> StorageError {
    tracing::error!(operation = name, error = %err, "Storage operation failed");
    InfrastructureError::Database {
        operation: name,
        message: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    fn policy() -> StoragePolicy {
        StoragePolicy::new(Duration::from_millis(50), Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_success_runs_once() {
        let calls = AtomicUsize::new(0);
        let calls_ref = &calls;

        let result = policy()
            .run("op", move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Ok::<_, sqlx::Error>(7)
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried_once() {
        let calls = AtomicUsize::new(0);
        let calls_ref = &calls;

        let result = policy()
            .run("op", move || async move {
                if calls_ref.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(sqlx::Error::PoolTimedOut)
                } else {
                    Ok::<i32, _>(1)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_failure_surfaces_as_infrastructure() {
        let calls = AtomicUsize::new(0);
        let calls_ref = &calls;

        let result: Result<(), _> = policy()
            .run("op", move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(sqlx::Error::PoolClosed)
            })
            .await;

        assert!(matches!(
            result,
            Err(StorageError::Infrastructure(InfrastructureError::Database {
                operation: "op",
                ..
            }))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_reported_with_budget() {
        let result: Result<(), _> = policy()
            .run("slow", || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<(), sqlx::Error>(())
            })
            .await;

        assert!(matches!(
            result,
            Err(StorageError::Infrastructure(InfrastructureError::Timeout {
                operation: "slow",
                timeout_ms: 50
            }))
        ));
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let calls_ref = &calls;

        let result: Result<(), _> = policy()
            .run("op", move || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(sqlx::Error::RowNotFound)
            })
            .await;

        assert!(matches!(result, Err(StorageError::Infrastructure(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
