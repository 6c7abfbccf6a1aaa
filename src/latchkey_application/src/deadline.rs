use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Deadline of {0:?} exceeded")]
pub struct DeadlineExceeded(pub Duration);

/// Run `operation` under an externally supplied deadline.
///
/// Dropping the future on timeout is safe for every store call because store
/// operations commit all-or-nothing.
pub async fn within<F, T, E>(deadline: Duration, operation: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<DeadlineExceeded>,
{
    tokio::time::timeout(deadline, operation)
        .await
        .map_err(|_| E::from(DeadlineExceeded(deadline)))?
}
