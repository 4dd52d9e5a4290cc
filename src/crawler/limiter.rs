//! Process-wide request rate limiting
//!
//! A single shared token window bounds aggregate request throughput across
//! all hosts. Every outbound request, retries included, acquires the
//! limiter before touching the network; acquisition suspends the calling
//! task (without blocking others) until capacity frees. There is no
//! per-host fairness by design: one slow target must not reserve budget
//! the rest of the crawl could use.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// A shared sliding-window rate limiter
///
/// At most `max_requests` acquisitions succeed within any `period`-long
/// window; further callers sleep until the oldest recorded request ages
/// out of the window.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    period: Duration,
    issued: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_requests` per `period`
    pub fn new(max_requests: usize, period: Duration) -> Self {
        Self {
            max_requests,
            period,
            issued: Mutex::new(VecDeque::new()),
        }
    }

    /// Acquires one request slot, suspending until capacity is available
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut issued = self.issued.lock().await;
                let now = Instant::now();

                // Drop timestamps that have aged out of the window
                while issued
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= self.period)
                {
                    issued.pop_front();
                }

                if issued.len() < self.max_requests {
                    issued.push_back(now);
                    return;
                }

                // Window is full: sleep until the oldest entry expires
                issued
                    .front()
                    .map(|t| self.period.saturating_sub(now.duration_since(*t)))
                    .unwrap_or(Duration::ZERO)
            };

            tokio::time::sleep(wait).await;
        }
    }
}
