//! Bounded retry with capped exponential backoff for listing page fetches.
//!
//! Transient failures (network errors, timeouts, any non-2xx status) are
//! retried; malformed payloads are returned immediately. When the attempt
//! budget runs out the last error is wrapped in
//! [`ScraperError::FetchFailure`] carrying the page context.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Attempt budget and backoff bounds for one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy with no sleeping between attempts, for tests.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based): `min * 2^(retry-1)`,
    /// clamped to `[min_backoff, max_backoff]`.
    ///
    /// | retry | delay with min=2s, max=10s |
    /// |-------|----------------------------|
    /// | 1     | 2 s                        |
    /// | 2     | 4 s                        |
    /// | 3     | 8 s                        |
    /// | 4+    | 10 s                       |
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(30);
        let scaled = self.min_backoff.saturating_mul(1u32 << exponent);
        scaled.clamp(self.min_backoff, self.max_backoff.max(self.min_backoff))
    }
}

/// Where a page request points, for logging and the exhausted-retry error.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageContext<'a> {
    pub source_name: &'a str,
    pub view: &'a str,
    pub page: u32,
}

fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::Http(_)
            | ScraperError::RateLimited { .. }
            | ScraperError::UnexpectedStatus { .. }
    )
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// the policy's attempt budget is spent.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    ctx: PageContext<'_>,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) {
            return Err(err);
        }

        if attempt >= max_attempts {
            return Err(ScraperError::FetchFailure {
                source_name: ctx.source_name.to_owned(),
                view: ctx.view.to_owned(),
                page: ctx.page,
                attempts: attempt,
                cause: Box::new(err),
            });
        }

        let delay = policy.backoff_for(attempt);
        tracing::warn!(
            source = ctx.source_name,
            view = ctx.view,
            page = ctx.page,
            attempt,
            max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient listing error, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
