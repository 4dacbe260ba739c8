//! Timeout, cancellation and bounded retry around a [`TestimonialSource`].

use std::sync::Arc;
use std::time::Duration;

use crate::cancel::CancelSignal;
use crate::error::{Disposition, FeedError, Result};
use crate::traits::TestimonialSource;
use crate::types::{Testimonial, TestimonialQuery};

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry bound and backoff for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 means a single attempt).
    pub max_retries: u32,
    /// Delay unit; the n-th retry waits `n * base_delay`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Linear backoff for the given 1-based failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.max(1))
    }

    /// Total attempts including the first one.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(1000))
    }
}

/// Loads testimonials for a widget.
///
/// # Failure handling
/// - Transport failures, timeouts and cancellation return at once.
/// - 404 and 5xx return at once.
/// - Other statuses and malformed payloads are retried per [`RetryPolicy`];
///   when the budget runs out the result is [`FeedError::RetriesExhausted`].
///
/// Every error this returns has [`Disposition::Fallback`].
pub struct DataLoader {
    source: Arc<dyn TestimonialSource>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl DataLoader {
    pub fn new(source: Arc<dyn TestimonialSource>) -> Self {
        Self {
            source,
            policy: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn load(
        &self,
        query: &TestimonialQuery,
        cancel: &CancelSignal,
    ) -> Result<Vec<Testimonial>> {
        let tag = self.source.id();
        let total = self.policy.total_attempts();
        let mut attempt = 1;

        loop {
            if cancel.is_cancelled() {
                return Err(FeedError::Cancelled);
            }

            let error = match self.attempt(query, cancel).await {
                Ok(mut items) => {
                    items.truncate(query.limit as usize);
                    log::debug!(
                        "[{tag}] Loaded {} testimonials for '{}' (attempt {attempt}/{total})",
                        items.len(),
                        query.campaign
                    );
                    return Ok(items);
                }
                Err(e) => e,
            };

            if error.disposition() == Disposition::Fallback {
                if error.is_expected() {
                    log::warn!("[{tag}] {error}; not retrying");
                } else {
                    log::error!("[{tag}] {error}; not retrying");
                }
                return Err(error);
            }

            if attempt >= total {
                log::warn!("[{tag}] Retry budget exhausted after {attempt} attempts: {error}");
                return Err(FeedError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(error),
                });
            }

            let delay = self.policy.delay_for(attempt);
            log::warn!(
                "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                tag,
                attempt,
                total,
                delay.as_secs_f32(),
                error
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(FeedError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }

    /// One fetch bounded by the timeout and the cancel signal.
    async fn attempt(
        &self,
        query: &TestimonialQuery,
        cancel: &CancelSignal,
    ) -> Result<Vec<Testimonial>> {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FeedError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.source.fetch(query)) => match result {
                Ok(Err(FeedError::Timeout { .. })) | Err(_) => {
                    Err(FeedError::Timeout { after_ms: timeout_ms })
                }
                Ok(inner) => inner,
            },
        }
    }
}
