//! Self-imposed outbound rate ceiling.
//!
//! Providers meter sends per second; exceeding the ceiling gets messages
//! silently dropped or the account flagged. [`RateThrottle`] enforces a
//! minimum spacing between consecutive sends, shared by every caller of
//! the same dispatcher.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Minimum-interval gate in front of the provider chain.
///
/// A single-token leaky bucket: one send may pass per `1/rate` seconds.
/// Callers queue on the internal mutex in arrival order, and the lock is
/// held across the wait, so even concurrent callers can never observe two
/// passes closer together than the interval.
#[derive(Debug)]
pub struct RateThrottle {
    min_interval: Duration,
    last_send: Mutex<Option<Instant>>,
}

impl RateThrottle {
    /// A throttle admitting `rate_per_second` sends per second (minimum 1).
    pub fn new(rate_per_second: u32) -> Self {
        let rate = rate_per_second.max(1);
        Self {
            min_interval: Duration::from_secs_f64(1.0 / f64::from(rate)),
            last_send: Mutex::new(None),
        }
    }

    /// Interval enforced between consecutive sends.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next send slot is available, then claim it.
    pub async fn acquire(&self) {
        let mut last = self.last_send.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.min_interval;
            if Instant::now() < ready_at {
                trace!(wait = ?(ready_at - Instant::now()), "throttling send");
                sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}
