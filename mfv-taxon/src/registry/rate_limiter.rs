//! Minimum-interval throttle for outbound registry requests

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum delay between consecutive requests
///
/// Holds the instant of the last request. One limiter is owned per client,
/// and every request kind goes through the same limiter.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait if necessary to comply with rate limit, then record the new request
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!(
                    sleep_ms = wait_time.as_millis() as u64,
                    "Rate limiting: sleeping before registry request"
                );
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}
