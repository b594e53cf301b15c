//! Rate limiting middleware
//!
//! Sliding-window command limits keyed by client IP address.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

/// Simple rate limiter
pub struct RateLimiter {
    requests: HashMap<IpAddr, Vec<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: HashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn is_allowed(&mut self, client: IpAddr) -> bool {
        self.is_allowed_at(client, Instant::now())
    }

    fn is_allowed_at(&mut self, client: IpAddr, now: Instant) -> bool {
        let entry = self.requests.entry(client).or_default();

        // Remove old requests
        entry.retain(|&time| now.duration_since(time) <= self.window);

        if entry.len() < self.max_requests {
            entry.push(now);
            true
        } else {
            false
        }
    }

    /// Drops clients with no request inside the current window.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.requests.retain(|_, times| {
            times.retain(|&time| now.duration_since(time) <= window);
            !times.is_empty()
        });
    }

    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLIENT: IpAddr = IpAddr::V4(std::net::Ipv4Addr::LOCALHOST);

    #[test]
    fn test_blocks_after_limit() {
        let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.is_allowed_at(CLIENT, now));
        assert!(limiter.is_allowed_at(CLIENT, now));
        assert!(!limiter.is_allowed_at(CLIENT, now));
    }

    #[test]
    fn test_window_expiry() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(1));
        let start = Instant::now();
        assert!(limiter.is_allowed_at(CLIENT, start));
        assert!(!limiter.is_allowed_at(CLIENT, start + Duration::from_millis(500)));
        assert!(limiter.is_allowed_at(CLIENT, start + Duration::from_secs(2)));
    }

    #[test]
    fn test_prune_keeps_active_clients() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(60));
        assert!(limiter.is_allowed(CLIENT));
        limiter.prune();
        assert_eq!(limiter.tracked_clients(), 1);

        let mut expired = RateLimiter::new(5, Duration::ZERO);
        expired
            .requests
            .insert(CLIENT, vec![Instant::now() - Duration::from_millis(5)]);
        expired.prune();
        assert_eq!(expired.tracked_clients(), 0);
    }
}
