//! Per-user sliding-window rate limiting.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::handler::{Error, ErrorKind};

/// Tracing target for rate limiting.
const TRACING_TARGET: &str = "auditron_server::service::rate_limit";

/// Default window length.
const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default requests allowed per window.
const DEFAULT_MAX_REQUESTS: usize = 10;

/// Sliding-window rate limiter keyed by user ID.
///
/// This type is cheap to clone and can be shared across threads.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<Uuid, Vec<Instant>>>>,
    window: Duration,
    max_requests: usize,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_limits(DEFAULT_WINDOW, DEFAULT_MAX_REQUESTS)
    }
}

impl RateLimiter {
    /// Creates a limiter with the default limits (10 requests per minute).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a limiter with explicit limits.
    pub fn with_limits(window: Duration, max_requests: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    /// Records one request for the user, rejecting past the limit.
    ///
    /// # Errors
    ///
    /// Returns a 429 error once the user has exhausted the window.
    pub async fn check(&self, user_id: Uuid) -> Result<(), Error<'static>> {
        let now = Instant::now();
        let mut requests = self.inner.lock().await;
        let recent = requests.entry(user_id).or_default();

        recent.retain(|instant| now.duration_since(*instant) < self.window);

        if recent.len() >= self.max_requests {
            tracing::warn!(
                target: TRACING_TARGET,
                %user_id,
                requests = recent.len(),
                "Rate limit exceeded"
            );
            return Err(ErrorKind::TooManyRequests.into_error());
        }

        recent.push(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn limit_applies_per_user() {
        let limiter = RateLimiter::with_limits(Duration::from_secs(60), 2);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(limiter.check(alice).await.is_ok());
        assert!(limiter.check(alice).await.is_ok());
        assert!(limiter.check(alice).await.is_err());

        // A different user has their own window.
        assert!(limiter.check(bob).await.is_ok());
    }

    #[tokio::test]
    async fn window_slides() {
        let limiter = RateLimiter::with_limits(Duration::from_millis(20), 1);
        let user = Uuid::new_v4();

        assert!(limiter.check(user).await.is_ok());
        assert!(limiter.check(user).await.is_err());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.check(user).await.is_ok());
    }
}
