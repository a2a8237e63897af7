//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Rate limiter keyed by caller (client IP for login attempts).
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one attempt for `key` and report whether it is allowed.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub reset_after: Duration,
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
