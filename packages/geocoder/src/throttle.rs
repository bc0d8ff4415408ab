//! Minimum-interval gate for outbound provider requests.
//!
//! Gaode keys are limited in queries per second. [`Throttle`] holds the
//! time of the last request behind an async mutex; each caller takes the
//! lock, sleeps until `interval` has passed since that time, records the
//! current time and releases the lock. Concurrent callers therefore go
//! out one at a time, spaced at least `interval` apart.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Shared request gate. Wrap in an `Arc` (or own it in a client) to
/// share across tasks.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Creates a gate enforcing `interval` between requests.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// Creates a gate from a millisecond interval.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Waits until a request may be issued, then marks one as issued.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                log::trace!("Throttling request for {remaining:?}");
                tokio::time::sleep(remaining).await;
            }
        }

        *last = Some(Instant::now());
    }
}
