use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Tagged result of a timeout-bounded upstream call.
///
/// Timeouts are not retried, and a timeout is handled identically to a
/// failed call: both fall back to the consuming component's documented
/// default. The tag keeps the substitution path explicit and testable.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Success(T),
    TimedOut,
    Failed(String),
}

impl<T> FetchOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            FetchOutcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

/// Run a fallible upstream call under a time bound, collapsing the nested
/// timeout/error shape into one tagged outcome
pub async fn with_timeout<T, E, F>(duration: Duration, call: F) -> FetchOutcome<T>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    match tokio::time::timeout(duration, call).await {
        Ok(Ok(value)) => FetchOutcome::Success(value),
        Ok(Err(e)) => FetchOutcome::Failed(e.to_string()),
        Err(_) => FetchOutcome::TimedOut,
    }
}
