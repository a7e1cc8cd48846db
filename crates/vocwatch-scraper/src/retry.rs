//! Retry with exponential backoff for transient fetch failures.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Transient conditions worth another attempt: the host asked us to back off,
/// or the request failed at the network level. Non-2xx statuses other than
/// 429 are propagated immediately — retrying a 403 block page changes nothing.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}

/// Executes `operation`, sleeping `backoff_base_secs * 2^attempt` seconds
/// between attempts, up to `max_retries` additional attempts after the first.
/// Non-retriable errors return immediately; the last error is returned once
/// retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                err
            }
        };

        // Cap the shift so extreme configs cannot overflow.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
