//! Retry helper for the external text-generation collaborator.
//!
//! The engine itself never retries anything; this module only models
//! the contract the host's insight-narration call hands back: a plain
//! [`CallOutcome`] value rather than an exception type. Quota and
//! billing failures are non-retryable and short-circuit the loop;
//! everything else is retried with exponential backoff up to the
//! configured attempt ceiling.
//!
//! Sleeping is injected so tests never block.
//!
//! # Example
//!
//! ```
//! use datasight::logger::NullLogger;
//! use datasight::retry::{with_retry, CallOutcome, RetryOptions};
//!
//! let mut attempts = 0;
//! let outcome = with_retry(
//!     &RetryOptions::default(),
//!     &NullLogger,
//!     "narrate insights",
//!     |_| {
//!         attempts += 1;
//!         if attempts < 3 {
//!             CallOutcome::Failed("timeout".into())
//!         } else {
//!             CallOutcome::Success("done")
//!         }
//!     },
//!     |_delay| {},
//! );
//! assert_eq!(outcome, CallOutcome::Success("done"));
//! assert_eq!(attempts, 3);
//! ```

use crate::logger::Logger;
use serde_json::json;
use std::time::Duration;

/// Backoff configuration for external calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryOptions {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Ceiling on any single delay.
    pub max_delay: Duration,
    /// Multiplier applied per attempt.
    pub backoff_factor: f64,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
        }
    }
}

/// Outcome of one external call, as a plain value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    /// The call succeeded.
    Success(T),
    /// Quota or billing failure; retrying cannot help.
    QuotaExceeded(String),
    /// Transient failure; eligible for retry.
    Failed(String),
}

impl<T> CallOutcome<T> {
    /// Returns `true` for [`CallOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Runs `op` with exponential backoff.
///
/// `op` receives the 0-based attempt number. `sleep` receives each
/// computed delay; production callers pass `std::thread::sleep`, tests
/// pass a recorder. The final outcome is whatever the last attempt
/// returned, except that [`CallOutcome::QuotaExceeded`] is returned
/// immediately without further attempts.
pub fn with_retry<T>(
    options: &RetryOptions,
    logger: &dyn Logger,
    context: &str,
    mut op: impl FnMut(u32) -> CallOutcome<T>,
    mut sleep: impl FnMut(Duration),
) -> CallOutcome<T> {
    for attempt in 0..=options.max_retries {
        logger.debug(
            &format!("attempting operation: {context}"),
            Some(json!({ "attempt": attempt, "maxRetries": options.max_retries })),
        );

        match op(attempt) {
            CallOutcome::Success(value) => {
                if attempt > 0 {
                    logger.info(
                        &format!("operation succeeded after {attempt} retries: {context}"),
                        None,
                    );
                }
                return CallOutcome::Success(value);
            }
            CallOutcome::QuotaExceeded(message) => {
                logger.warn(
                    &format!("quota/billing error, stopping retries: {context}"),
                    Some(json!({ "attempt": attempt + 1, "errorMessage": message })),
                );
                return CallOutcome::QuotaExceeded(message);
            }
            CallOutcome::Failed(message) => {
                logger.warn(
                    &format!("operation failed on attempt {}: {context}", attempt + 1),
                    Some(json!({
                        "attempt": attempt + 1,
                        "maxRetries": options.max_retries,
                        "errorMessage": message,
                    })),
                );
                if attempt == options.max_retries {
                    logger.error(
                        &format!("operation failed after all retries: {context}"),
                        Some(json!({ "totalAttempts": options.max_retries + 1 })),
                    );
                    return CallOutcome::Failed(message);
                }
                let delay = backoff_delay(options, attempt);
                logger.debug(
                    &format!("waiting {}ms before retry: {context}", delay.as_millis()),
                    None,
                );
                sleep(delay);
            }
        }
    }
    unreachable!("loop always returns on the final attempt")
}

/// Delay before the retry following `attempt`: base · factor^attempt,
/// capped at `max_delay`.
fn backoff_delay(options: &RetryOptions, attempt: u32) -> Duration {
    let scaled = options.base_delay.as_millis() as f64 * options.backoff_factor.powi(attempt as i32);
    let capped = scaled.min(options.max_delay.as_millis() as f64);
    Duration::from_millis(capped as u64)
}
