//! Client-side token-bucket rate limiter.
//!
//! The bucket starts full with `burst` tokens and refills continuously at
//! `per_second`. A waiter reserves a token up front and then sleeps until that
//! token becomes available; dropping the wait before it completes hands the
//! token back.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::RateLimitError;

/// Refill rate and burst capacity of a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimit {
    /// Tokens added per second. `f64::INFINITY` disables limiting.
    pub per_second: f64,
    /// Bucket capacity.
    pub burst: u32,
}

impl RateLimit {
    pub const fn new(per_second: f64, burst: u32) -> Self {
        Self { per_second, burst }
    }

    /// A limit that never blocks.
    pub const fn unlimited() -> Self {
        Self {
            per_second: f64::INFINITY,
            burst: 1,
        }
    }

    fn is_unlimited(&self) -> bool {
        self.per_second == f64::INFINITY
    }
}

impl Default for RateLimit {
    /// 10 requests per second, burst 1.
    fn default() -> Self {
        Self::new(10.0, 1)
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

impl Bucket {
    fn advance(&mut self, now: Instant, limit: &RateLimit) {
        if now <= self.last {
            return;
        }
        if limit.per_second > 0.0 {
            let elapsed = now.duration_since(self.last).as_secs_f64();
            self.tokens = (self.tokens + elapsed * limit.per_second).min(limit.burst as f64);
        }
        self.last = now;
    }
}

/// Token-bucket limiter shared by every clone of a client.
#[derive(Debug)]
pub struct RateLimiter {
    limit: RateLimit,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            bucket: Mutex::new(Bucket {
                tokens: limit.burst as f64,
                last: Instant::now(),
            }),
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Wait until one request may proceed.
    ///
    /// With `max_wait` set, a permit that would take longer than `max_wait`
    /// to become available is refused immediately and no token is consumed.
    pub async fn wait(&self, max_wait: Option<Duration>) -> Result<(), RateLimitError> {
        let delay = self.reserve(Instant::now(), max_wait)?;
        if delay.is_zero() {
            return Ok(());
        }

        tracing::debug!(delay_ms = delay.as_millis() as u64, "Waiting for rate limit permit");
        let mut reservation = Reservation {
            limiter: self,
            pending: true,
        };
        futures_timer::Delay::new(delay).await;
        reservation.pending = false;
        Ok(())
    }

    /// Take one token at `now`, returning how long the caller must wait
    /// before using it.
    fn reserve(&self, now: Instant, max_wait: Option<Duration>) -> Result<Duration, RateLimitError> {
        if self.limit.is_unlimited() {
            return Ok(Duration::ZERO);
        }
        if self.limit.burst == 0 {
            return Err(RateLimitError::ExceedsBurst);
        }

        let mut bucket = self.bucket.lock();
        bucket.advance(now, &self.limit);

        let remaining = bucket.tokens - 1.0;
        let wait = if remaining >= 0.0 {
            Duration::ZERO
        } else if !(self.limit.per_second > 0.0) {
            return Err(RateLimitError::NoRefill);
        } else {
            Duration::try_from_secs_f64(-remaining / self.limit.per_second)
                .map_err(|_| RateLimitError::WaitTooLong)?
        };

        if let Some(max_wait) = max_wait {
            if wait > max_wait {
                return Err(RateLimitError::WouldExceedDeadline { wait, max_wait });
            }
        }

        bucket.tokens = remaining;
        Ok(wait)
    }

    /// Return a reserved token that was never used.
    fn cancel(&self) {
        let mut bucket = self.bucket.lock();
        bucket.tokens = (bucket.tokens + 1.0).min(self.limit.burst as f64);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimit::default())
    }
}

/// Gives the token back if the waiting future is dropped mid-sleep.
struct Reservation<'a> {
    limiter: &'a RateLimiter,
    pending: bool,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.pending {
            self.limiter.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(per_second: f64, burst: u32) -> RateLimiter {
        RateLimiter::new(RateLimit::new(per_second, burst))
    }

    #[test]
    fn test_default_limit() {
        let limit = RateLimit::default();
        assert_eq!(limit.per_second, 10.0);
        assert_eq!(limit.burst, 1);
    }

    #[test]
    fn test_burst_then_wait() {
        let l = limiter(10.0, 2);
        let now = Instant::now();
        assert_eq!(l.reserve(now, None).unwrap(), Duration::ZERO);
        assert_eq!(l.reserve(now, None).unwrap(), Duration::ZERO);

        let third = l.reserve(now, None).unwrap();
        assert_eq!(third.as_millis(), 100);
        // Each further reservation queues behind the previous one.
        let fourth = l.reserve(now, None).unwrap();
        assert_eq!(fourth.as_millis(), 200);
    }

    #[test]
    fn test_refill_over_time() {
        let l = limiter(10.0, 1);
        let start = Instant::now();
        assert_eq!(l.reserve(start, None).unwrap(), Duration::ZERO);
        assert_eq!(
            l.reserve(start + Duration::from_millis(100), None).unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn test_refill_capped_at_burst() {
        let l = limiter(10.0, 1);
        let later = Instant::now() + Duration::from_secs(60);
        assert_eq!(l.reserve(later, None).unwrap(), Duration::ZERO);
        assert!(l.reserve(later, None).unwrap() > Duration::ZERO);
    }

    #[test]
    fn test_max_wait_refuses_without_consuming() {
        let l = limiter(1.0, 1);
        let now = Instant::now();
        l.reserve(now, None).unwrap();

        let err = l.reserve(now, Some(Duration::from_millis(10))).unwrap_err();
        assert!(matches!(err, RateLimitError::WouldExceedDeadline { .. }));

        // The refused attempt did not queue behind anything.
        assert_eq!(l.reserve(now, None).unwrap().as_secs(), 1);
    }

    #[test]
    fn test_zero_burst_always_refused() {
        let l = limiter(10.0, 0);
        assert_eq!(
            l.reserve(Instant::now(), None).unwrap_err(),
            RateLimitError::ExceedsBurst
        );
    }

    #[test]
    fn test_zero_rate_exhausts() {
        let l = limiter(0.0, 1);
        let now = Instant::now();
        l.reserve(now, None).unwrap();
        assert_eq!(
            l.reserve(now + Duration::from_secs(5), None).unwrap_err(),
            RateLimitError::NoRefill
        );
    }

    #[test]
    fn test_unrepresentable_wait_refused() {
        let l = limiter(1e-20, 1);
        let now = Instant::now();
        l.reserve(now, Some(Duration::from_secs(1))).unwrap();
        assert_eq!(
            l.reserve(now, Some(Duration::from_secs(1))).unwrap_err(),
            RateLimitError::WaitTooLong
        );
        assert_eq!(l.reserve(now, None).unwrap_err(), RateLimitError::WaitTooLong);
    }

    #[test]
    fn test_unlimited_never_waits() {
        let l = RateLimiter::new(RateLimit::unlimited());
        let now = Instant::now();
        for _ in 0..100 {
            assert_eq!(l.reserve(now, None).unwrap(), Duration::ZERO);
        }
    }

    #[test]
    fn test_cancel_returns_token() {
        let l = limiter(1.0, 1);
        let now = Instant::now();
        l.reserve(now, None).unwrap();
        assert!(l.reserve(now, None).unwrap() > Duration::ZERO);
        l.cancel();
        l.cancel();
        assert_eq!(l.reserve(now, None).unwrap(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_wait_blocks_until_refill() {
        let l = limiter(20.0, 1);
        let start = Instant::now();
        for _ in 0..3 {
            l.wait(None).await.unwrap();
        }
        // Two refills at 50ms each.
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_dropped_wait_returns_token() {
        let l = limiter(1.0, 1);
        l.wait(None).await.unwrap();

        let pending = tokio::time::timeout(Duration::from_millis(20), l.wait(None)).await;
        assert!(pending.is_err(), "second wait should still be sleeping");

        // The timed-out waiter handed its reservation back, so the next
        // caller queues for one token, not two.
        let wait = l.reserve(Instant::now(), None).unwrap();
        assert!(wait <= Duration::from_secs(1));
    }
}
