use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::AppError;

/// Token bucket refilled continuously at `rps` tokens per second, holding at most `rps`.
#[derive(Clone)]
pub struct RateLimiter {
    rps: u32,
    state: Arc<Mutex<Bucket>>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

impl RateLimiter {
    /// `None` when `rps` is zero, meaning generation is not rate limited.
    pub fn new(rps: u32) -> Option<Self> {
        if rps == 0 {
            return None;
        }
        Some(Self {
            rps,
            state: Arc::new(Mutex::new(Bucket {
                tokens: f64::from(rps),
                last: Instant::now(),
            })),
        })
    }

    pub async fn check(&self) -> Result<(), AppError> {
        let mut bucket = self.state.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last);
        bucket.last = now;

        let capacity = f64::from(self.rps);
        let refill = (elapsed.as_secs_f64() * capacity).min(capacity);
        bucket.tokens = (bucket.tokens + refill).min(capacity);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            return Ok(());
        }

        let wait = Duration::from_secs_f64((1.0 - bucket.tokens) / capacity);
        Err(AppError::RateLimited {
            rps: self.rps,
            retry_after_ms: wait.as_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RateLimiter;
    use crate::error::AppError;

    #[test]
    fn zero_rps_disables_limiting() {
        assert!(RateLimiter::new(0).is_none());
    }

    #[tokio::test]
    async fn burst_beyond_capacity_is_rejected() {
        let limiter = RateLimiter::new(2).expect("limiter enabled");
        assert!(limiter.check().await.is_ok());
        assert!(limiter.check().await.is_ok());
        let err = limiter.check().await.expect_err("bucket drained");
        assert!(matches!(err, AppError::RateLimited { rps: 2, .. }));
    }
}
