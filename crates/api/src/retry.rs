//! Retry helper for slow endpoints.
//!
//! Only timeouts are retried. Every other error, including auth failures,
//! is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::ApiError;

/// Attempts used by the product detail page.
pub const PRODUCT_DETAIL_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubles after each timeout.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Run `op` up to `attempts` times while it keeps timing out.
///
/// `op` receives the 1-based attempt number.
///
/// # Errors
///
/// The last error from `op`: [`ApiError::Timeout`] when every attempt timed
/// out, or the first non-timeout error.
pub async fn with_timeout_backoff<T, F, Fut>(
    attempts: u32,
    base_delay: Duration,
    mut op: F,
) -> Result<T, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let attempts = attempts.max(1);
    let mut delay = base_delay;
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Err(ApiError::Timeout) if attempt < attempts => {
                tracing::warn!(attempt, ?delay, "Request timed out, retrying");
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    const TICK: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn test_retries_timeouts_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_timeout_backoff(3, TICK, |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(ApiError::Timeout)
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_timeout_backoff(3, TICK, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::Timeout) }
        })
        .await;
        assert!(result.unwrap_err().is_timeout());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_timeout_backoff(3, TICK, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::AuthExpired) }
        })
        .await;
        assert!(result.unwrap_err().is_auth());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
