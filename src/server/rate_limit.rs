// Rate Limiting Collaborator - caps submission attempts per requester
//
// Keyed by requester identity (email, falling back to remote address). A
// denial carries the epoch-millis instant at which the next attempt becomes
// admissible, for the human-readable cooldown message.

use std::num::NonZeroU32;
use std::time::Duration;

use chrono::Utc;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("max_requests must be non-zero")]
    ZeroMaxRequests,
    #[error("window_ms must be non-zero")]
    ZeroWindow,
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Epoch millis at which the requester may try again. Meaningful only
    /// when `allowed` is false.
    pub reset_time: i64,
}

impl RateLimitDecision {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reset_time: 0,
        }
    }

    pub fn denied_until(reset_time: i64) -> Self {
        Self {
            allowed: false,
            reset_time,
        }
    }

    /// Whole minutes (rounded up, at least one) until the cooldown expires.
    pub fn minutes_until_reset(&self) -> i64 {
        let wait_ms = (self.reset_time - Utc::now().timestamp_millis()).max(0);
        (wait_ms + 59_999) / 60_000
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait RateLimit: Send + Sync {
    fn check(&self, identifier: &str) -> RateLimitDecision;
}

/// Governor-backed keyed limiter: `max_requests` admitted per `window_ms`
/// rolling window, per identifier.
pub struct GovernorRateLimit {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl GovernorRateLimit {
    pub fn new(window_ms: u64, max_requests: u32) -> Result<Self, RateLimitError> {
        if window_ms == 0 {
            return Err(RateLimitError::ZeroWindow);
        }
        let max_requests = NonZeroU32::new(max_requests).ok_or(RateLimitError::ZeroMaxRequests)?;
        let quota = Quota::with_period(Duration::from_millis(window_ms))
            .ok_or(RateLimitError::ZeroWindow)?
            .allow_burst(max_requests);
        Ok(Self {
            limiter: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        })
    }
}

impl RateLimit for GovernorRateLimit {
    fn check(&self, identifier: &str) -> RateLimitDecision {
        match self.limiter.check_key(&identifier.to_string()) {
            Ok(_) => RateLimitDecision::allowed(),
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                let reset_time = Utc::now().timestamp_millis() + wait.as_millis() as i64;
                tracing::warn!(
                    identifier,
                    wait_ms = wait.as_millis() as u64,
                    "submission attempt rate limited"
                );
                RateLimitDecision::denied_until(reset_time)
            }
        }
    }
}
