//! Per-client sliding-window admission control.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Rate limiter that keeps the request timestamps of each client inside the
/// trailing window.
///
/// State resets on restart and is not shared between instances, so this is
/// advisory throttling rather than a security boundary.
pub struct RateLimiter {
    /// Map of client id -> admitted request times, oldest first
    clients: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    /// Maximum requests admitted per client within the window
    max_requests: usize,
    window: Duration,
    shutdown: CancellationToken,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            max_requests: max_requests as usize,
            window,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Admit or reject a request from `client`.
    /// Only admitted requests are recorded.
    pub fn allow(&self, client: &str) -> bool {
        if self.max_requests == 0 {
            return false;
        }
        let now = Instant::now();
        let mut clients = self.clients.lock();

        let Some(hits) = clients.get_mut(client) else {
            clients.insert(client.to_owned(), VecDeque::from([now]));
            return true;
        };
        while hits
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            hits.pop_front();
        }
        if hits.len() >= self.max_requests {
            return false;
        }
        hits.push_back(now);
        true
    }

    /// Drop clients whose latest request is older than twice the window.
    /// Returns the number of clients removed.
    pub fn cleanup(&self) -> usize {
        reclaim(&self.clients, self.window, Instant::now())
    }

    /// Start the background reclamation task, running once per window until
    /// [`shutdown`](Self::shutdown).
    pub fn start_cleanup_task(&self) {
        let clients = self.clients.clone();
        let window = self.window;
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        debug!("rate limiter cleanup task shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(window) => {
                        reclaim(&clients, window, Instant::now());
                    }
                }
            }
        });
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Signal shutdown to cleanup task.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn reclaim(
    clients: &Mutex<HashMap<String, VecDeque<Instant>>>,
    window: Duration,
    now: Instant,
) -> usize {
    let idle = window * 2;
    let mut map = clients.lock();
    let before = map.len();
    map.retain(|_, hits| hits.back().is_some_and(|t| now.duration_since(*t) < idle));
    let removed = before - map.len();
    if removed > 0 {
        debug!(removed, remaining = map.len(), "rate limit entries cleaned up");
    }
    removed
}

#[cfg(test)]
mod tests {
    use std::thread::sleep;

    use super::*;

    #[test]
    fn test_rate_limit_window() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1));

        let first: Vec<bool> = (0..4).map(|_| limiter.allow("10.0.0.1")).collect();
        assert_eq!(first, [true, true, true, false]);

        sleep(Duration::from_millis(1100));
        assert!(limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_rate_limit_different_clients() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));

        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1")); // blocked

        assert!(limiter.allow("10.0.0.2"));
        assert!(limiter.allow("10.0.0.2"));
        assert!(!limiter.allow("10.0.0.2")); // blocked
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn test_rejected_requests_are_not_recorded() {
        let limiter = RateLimiter::new(1, Duration::from_millis(200));
        assert!(limiter.allow("c"));
        for _ in 0..10 {
            assert!(!limiter.allow("c"));
        }
        sleep(Duration::from_millis(250));
        assert!(limiter.allow("c"));
    }

    #[test]
    fn test_zero_ceiling_rejects_everything() {
        let limiter = RateLimiter::new(0, Duration::from_secs(1));
        assert!(!limiter.allow("c"));
        assert!(limiter.is_empty());
    }

    #[test]
    fn test_cleanup_removes_idle_clients() {
        let limiter = RateLimiter::new(5, Duration::from_millis(20));
        limiter.allow("idle");
        sleep(Duration::from_millis(50));
        limiter.allow("active");

        assert_eq!(limiter.cleanup(), 1);
        assert_eq!(limiter.len(), 1);
        assert!(limiter.allow("active"));
    }

    #[tokio::test]
    async fn test_cleanup_task_reclaims_and_stops() {
        let limiter = RateLimiter::new(5, Duration::from_millis(20));
        limiter.start_cleanup_task();
        limiter.allow("a");
        limiter.allow("b");

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(limiter.is_empty());

        limiter.shutdown();
        limiter.allow("c");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(limiter.len(), 1);
    }
}
