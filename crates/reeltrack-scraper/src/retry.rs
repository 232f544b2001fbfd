//! Retry with linear back-off for provider calls.
//!
//! Every error except a missing credential or a malformed base URL is retried.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Attempt errors kept in the final summary.
const MAX_SUMMARY_ERRORS: usize = 4;

/// Returns `true` for errors that are worth another attempt.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    !matches!(
        err,
        ScraperError::MissingToken | ScraperError::InvalidBaseUrl { .. }
    )
}

/// Runs `operation` up to `max_attempts` times in total.
///
/// Sleeps `base_delay * attempt` between attempts (1.5 s, 3 s, ... with the
/// default base). When every attempt fails, returns
/// [`ScraperError::Exhausted`] whose message joins the first few attempt
/// errors with ` | `. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    label: &str,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut errors: Vec<String> = Vec::new();
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) {
                    return Err(err);
                }
                errors.push(format!("{label} attempt {attempt}: {err}"));
                if attempt >= max_attempts {
                    errors.truncate(MAX_SUMMARY_ERRORS);
                    return Err(ScraperError::Exhausted {
                        attempts: attempt,
                        summary: errors.join(" | "),
                    });
                }
                let delay = base_delay.saturating_mul(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "provider call failed, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
