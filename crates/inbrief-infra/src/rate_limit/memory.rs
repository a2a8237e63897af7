//! In-memory keyed rate limiter using governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::{Clock as _, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota};

use inbrief_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts per window and key.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Load from `LOGIN_RATE_LIMIT_MAX` and `LOGIN_RATE_LIMIT_WINDOW_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("LOGIN_RATE_LIMIT_MAX")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_requests),
            window: std::env::var("LOGIN_RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }

    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(NonZeroU32::MIN);
        let period = (self.window / burst.get()).max(Duration::from_millis(1));

        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Per-key limiter using the GCRA algorithm.
///
/// Limits are per-process, not shared across instances.
pub struct InMemoryRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let limiter = DefaultKeyedRateLimiter::keyed(config.quota());
        Self {
            limiter,
            clock: DefaultClock::default(),
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let key = key.to_string();
        let result = match self.limiter.check_key(&key) {
            Ok(_) => RateLimitResult {
                allowed: true,
                reset_after: Duration::ZERO,
            },
            Err(not_until) => RateLimitResult {
                allowed: false,
                reset_after: not_until.wait_time_from(self.clock.now()),
            },
        };

        if self.limiter.len() > 10_000 {
            self.limiter.retain_recent();
        }
        Ok(result)
    }
}
