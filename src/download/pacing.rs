//! Fixed pause between download attempts.
//!
//! The interval is configured in (possibly fractional) seconds, but the wait
//! itself only has whole-second granularity: `1.9` sleeps one second and
//! `0.5` does not sleep at all, although it still counts as enabled.

use std::time::Duration;

use tracing::{debug, instrument};

use super::constants::DEFAULT_INTERVAL_SECS;

/// Pause applied after every download attempt, successful or not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// Interval exactly as configured.
    interval_secs: f64,
    /// The wait actually applied.
    delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_secs(DEFAULT_INTERVAL_SECS)
    }
}

impl Pacing {
    /// Creates pacing from a configured interval in seconds.
    ///
    /// Zero, negative and NaN intervals disable pacing.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_secs(interval_secs: f64) -> Self {
        let delay = if interval_secs > 0.0 {
            // Float-to-int `as` truncates toward zero and saturates.
            Duration::from_secs(interval_secs as u64)
        } else {
            Duration::ZERO
        };
        Self {
            interval_secs,
            delay,
        }
    }

    /// Creates pacing that never waits.
    #[must_use]
    pub fn disabled() -> Self {
        Self::from_secs(0.0)
    }

    /// Returns whether pacing is disabled (interval not greater than zero).
    #[must_use]
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn is_disabled(&self) -> bool {
        !(self.interval_secs > 0.0)
    }

    /// Returns the interval as configured.
    #[must_use]
    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    /// Returns the wait actually applied.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Suspends for the truncated interval. Returns immediately when disabled.
    #[instrument(level = "trace", skip(self), fields(delay_secs = self.delay.as_secs()))]
    pub async fn wait(&self) {
        if self.is_disabled() {
            return;
        }
        debug!("pacing before next attempt");
        tokio::time::sleep(self.delay).await;
    }
}
