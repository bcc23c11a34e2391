//! Rate limiting for connection attempts.
//!
//! A token bucket shared by every worker caps how many connection attempts
//! the whole pool starts per second. Retries draw from the same bucket.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// A shared limiter on connection attempts per second.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<GovLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RateLimiter {
    /// Create a limiter for `rate` attempts per second.
    ///
    /// Returns `None` for a rate of 0, which means unlimited.
    pub fn new(rate: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rate)?;
        let limiter = GovLimiter::direct(Quota::per_second(rate));

        Some(Self {
            limiter: Arc::new(limiter),
        })
    }

    /// Wait until the limit allows another attempt.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
