//! Transport-level retry policy.
//!
//! Retries live inside the HTTP transport; the operation executor and the
//! pagination driver never retry on their own.

use std::time::Duration;

use rand::Rng;

use crate::error::ClientError;

/// Retry decision result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after a delay.
    RetryAfter(Duration),
    /// Do not retry.
    DoNotRetry,
}

/// When retries are allowed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategy {
    /// Never retry.
    Never,
    /// Retry only operations that are safe to replay.
    IdempotentOnly,
    /// Retry regardless of idempotency.
    Always,
}

/// Exponential-backoff retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: usize,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum jitter added to delays.
    pub max_jitter: Duration,
    /// Retry strategy.
    pub strategy: RetryStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            max_jitter: Duration::from_millis(100),
            strategy: RetryStrategy::IdempotentOnly,
        }
    }
}

impl RetryPolicy {
    /// Decide whether to retry based on the error and attempt count.
    ///
    /// A server-supplied `Retry-After` wins over the computed backoff.
    #[must_use]
    pub fn decide(&self, error: &ClientError, attempt: usize, idempotent: bool) -> RetryDecision {
        if attempt >= self.max_attempts || !error.is_retryable() {
            return RetryDecision::DoNotRetry;
        }

        match self.strategy {
            RetryStrategy::Never => RetryDecision::DoNotRetry,
            RetryStrategy::IdempotentOnly if !idempotent => RetryDecision::DoNotRetry,
            _ => {
                if let ClientError::HttpStatus {
                    retry_after: Some(delay),
                    ..
                } = error
                {
                    return RetryDecision::RetryAfter(*delay);
                }
                RetryDecision::RetryAfter(self.backoff(attempt))
            }
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let exp =
            2_u64.saturating_pow(u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX));
        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        let delay_ms = base_ms.saturating_mul(exp).min(max_ms);

        let jitter_ms = if self.max_jitter.as_millis() > 0 {
            let jitter_max = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
            rand::thread_rng().gen_range(0..=jitter_max)
        } else {
            0
        };
        Duration::from_millis(delay_ms.saturating_add(jitter_ms))
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    fn server_error() -> ClientError {
        ClientError::HttpStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
            retry_after: None,
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn retries_server_errors_until_attempts_exhausted() {
        let policy = policy();
        assert!(matches!(
            policy.decide(&server_error(), 1, true),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(
            policy.decide(&server_error(), 3, true),
            RetryDecision::DoNotRetry
        );
    }

    #[test]
    fn does_not_retry_non_retryable_errors() {
        let policy = policy();
        let err = ClientError::Json("bad payload".to_string());
        assert_eq!(policy.decide(&err, 1, true), RetryDecision::DoNotRetry);
    }

    #[test]
    fn idempotent_only_blocks_mutations() {
        let policy = policy();
        assert_eq!(
            policy.decide(&server_error(), 1, false),
            RetryDecision::DoNotRetry
        );
    }

    #[test]
    fn honors_server_retry_after() {
        let policy = policy();
        let err = ClientError::HttpStatus {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
            retry_after: Some(Duration::from_secs(7)),
        };
        assert_eq!(
            policy.decide(&err, 1, true),
            RetryDecision::RetryAfter(Duration::from_secs(7))
        );
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(400),
            max_jitter: Duration::ZERO,
            strategy: RetryStrategy::Always,
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(5), Duration::from_millis(400));
    }
}
