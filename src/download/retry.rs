//! Retry policy for failed downloads.
//!
//! Every failure kind is retried the same way: a 404 and a dropped
//! connection both send the item back for another attempt. The only knob is
//! how many attempts an item gets.
//!
//! # Example
//!
//! ```
//! use gallery_grab::download::{RetryDecision, RetryPolicy};
//!
//! let policy = RetryPolicy::with_max_attempts(2);
//! assert!(matches!(policy.should_retry(1), RetryDecision::Retry { attempt: 2 }));
//! assert!(matches!(policy.should_retry(2), RetryDecision::DoNotRetry { .. }));
//!
//! // The default never gives up.
//! let forever = RetryPolicy::default();
//! assert!(matches!(forever.should_retry(10_000), RetryDecision::Retry { .. }));
//! ```

use tracing::debug;

/// Decision on whether to retry a failed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the same item.
    Retry {
        /// Which attempt number this will be (1-indexed, so first retry is attempt 2).
        attempt: u32,
    },

    /// Abandon the item.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// How many attempts an item gets before it is abandoned.
///
/// The default is unlimited: a URL that never succeeds keeps the loop
/// retrying it until the process is killed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts including the first; `None` means no limit.
    max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Creates a policy that retries forever.
    #[must_use]
    pub fn unlimited() -> Self {
        Self { max_attempts: None }
    }

    /// Creates a policy that gives up after `max_attempts` attempts (minimum 1).
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts.max(1)),
        }
    }

    /// Returns the configured attempt limit, if any.
    #[must_use]
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Returns whether this policy ever gives up.
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.max_attempts.is_none()
    }

    /// Decides what to do after attempt number `attempt` (1-indexed) failed.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> RetryDecision {
        match self.max_attempts {
            Some(max) if attempt >= max => {
                debug!(attempt, max, "max attempts reached");
                RetryDecision::DoNotRetry {
                    reason: format!("max attempts ({max}) exhausted"),
                }
            }
            _ => RetryDecision::Retry {
                attempt: attempt.saturating_add(1),
            },
        }
    }
}
