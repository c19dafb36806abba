//! Attempt loop with linear backoff for the product page fetcher.
//!
//! Every failed attempt is retried; the fetcher does not distinguish
//! permanent from transient failures. The wait before attempt `n + 1` is
//! `n × backoff_base_ms`.

use std::future::Future;
use std::time::Duration;

/// Why a single attempt was rejected.
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// The server answered, but not with `200 OK`.
    Status(u16),
    /// The request never produced a usable response (connect, timeout, body read).
    Network(reqwest::Error),
}

/// Summary of a run in which every attempt failed.
#[derive(Debug)]
pub(crate) struct RetryExhausted {
    pub(crate) attempts: u32,
    pub(crate) last_status: Option<u16>,
    /// Last network-level error from any attempt, even if later attempts
    /// failed on status instead.
    pub(crate) last_network_error: Option<reqwest::Error>,
}

/// Delay before the attempt that follows attempt number `attempt` (1-based).
pub(crate) fn backoff_delay(attempt: u32, backoff_base_ms: u64) -> Duration {
    Duration::from_millis(backoff_base_ms.saturating_mul(u64::from(attempt)))
}

/// Runs `operation` up to `max_attempts` times, sleeping
/// [`backoff_delay`] between attempts. No sleep follows the final attempt.
///
/// A `max_attempts` of `0` is treated as `1`.
pub(crate) async fn retry_with_linear_backoff<T, F, Fut>(
    max_attempts: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, RetryExhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut exhausted = RetryExhausted {
        attempts: 0,
        last_status: None,
        last_network_error: None,
    };

    for attempt in 1..=max_attempts {
        exhausted.attempts = attempt;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Status(status)) => {
                tracing::warn!(attempt, max_attempts, status, "request rejected");
                exhausted.last_status = Some(status);
            }
            Err(AttemptError::Network(err)) => {
                tracing::warn!(attempt, max_attempts, error = %err, "request failed");
                exhausted.last_network_error = Some(err);
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(backoff_delay(attempt, backoff_base_ms)).await;
        }
    }

    Err(exhausted)
}
