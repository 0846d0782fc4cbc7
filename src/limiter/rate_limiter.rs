//! Rate Limiter Module
//!
//! Fixed-window request quota per hashed client identity.
//!
//! A window opens on the first request from an identity and closes exactly
//! `window` later, independent of traffic. Closed windows are removed by a
//! min-heap sweep rather than one timer per identity; `admit` also treats a
//! window past its deadline as closed, so the sweep cadence never stretches
//! a window.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::limiter::hash_identity;

// == Admission ==
/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Request may proceed; `remaining` requests are left in this window
    Allowed { remaining: u64 },
    /// Quota exhausted until the window resets
    Denied { retry_after_secs: u64 },
}

impl Admission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed { .. })
    }
}

// == Rate Limit Window ==
/// Per-identity window record.
#[derive(Debug, Clone)]
pub struct RateLimitWindow {
    /// Requests admitted in this window
    pub count: u64,
    /// When the window opened
    pub window_start: Instant,
    /// When the window closes
    pub deadline: Instant,
}

// == Limiter Stats ==
/// Admission counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LimiterStats {
    pub admitted: u64,
    pub denied: u64,
    /// Identities with an open window
    pub active_windows: usize,
}

// == Rate Limiter ==
#[derive(Debug)]
pub struct RateLimiter {
    /// Window length
    window: Duration,
    /// Requests allowed per window
    max_requests: u64,
    /// Hashed identity to open window
    windows: HashMap<String, RateLimitWindow>,
    /// Window deadlines, earliest first; may hold stale entries
    deadlines: BinaryHeap<Reverse<(Instant, String)>>,
    admitted: u64,
    denied: u64,
}

impl RateLimiter {
    // == Constructor ==
    /// Creates a limiter allowing `max_requests` per `window` per identity.
    pub fn new(window: Duration, max_requests: u64) -> Self {
        Self {
            window,
            max_requests,
            windows: HashMap::new(),
            deadlines: BinaryHeap::new(),
            admitted: 0,
            denied: 0,
        }
    }

    /// Creates a limiter from the configured window and quota.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.rate_limit_window_ms),
            config.rate_limit_max_requests,
        )
    }

    // == Admit ==
    /// Checks and records one request from `identity`.
    pub fn admit(&mut self, identity: &str) -> Admission {
        self.admit_at(identity, Instant::now())
    }

    /// Same as [`RateLimiter::admit`] with an explicit current time.
    ///
    /// The count is compared before it is incremented: requests finding
    /// `count < max_requests` pass, the first finding `count == max_requests`
    /// is denied. Denied requests do not consume quota.
    pub fn admit_at(&mut self, identity: &str, now: Instant) -> Admission {
        let key = hash_identity(identity);
        let retry_after_secs = self.retry_after_secs();

        if self.windows.get(&key).is_some_and(|w| now >= w.deadline) {
            self.windows.remove(&key);
        }

        let window = match self.windows.entry(key) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let deadline = now + self.window;
                self.deadlines
                    .push(Reverse((deadline, vacant.key().clone())));
                vacant.insert(RateLimitWindow {
                    count: 0,
                    window_start: now,
                    deadline,
                })
            }
        };

        if window.count >= self.max_requests {
            self.denied += 1;
            debug!(count = window.count, retry_after_secs, "request denied");
            return Admission::Denied { retry_after_secs };
        }

        window.count += 1;
        self.admitted += 1;
        Admission::Allowed {
            remaining: self.max_requests - window.count,
        }
    }

    // == Sweep ==
    /// Removes every window whose deadline has passed.
    ///
    /// Returns the number of windows removed.
    pub fn sweep_expired(&mut self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    /// Same as [`RateLimiter::sweep_expired`] with an explicit current time.
    pub fn sweep_expired_at(&mut self, now: Instant) -> usize {
        let mut removed = 0;

        while let Some(Reverse((deadline, _))) = self.deadlines.peek() {
            if *deadline > now {
                break;
            }
            let Some(Reverse((deadline, key))) = self.deadlines.pop() else {
                break;
            };
            // A window reopened after lazy expiry has a newer deadline
            if self
                .windows
                .get(&key)
                .is_some_and(|w| w.deadline == deadline)
            {
                self.windows.remove(&key);
                removed += 1;
            }
        }

        removed
    }

    // == Accessors ==
    /// Seconds a denied caller should wait: the window length, rounded up.
    pub fn retry_after_secs(&self) -> u64 {
        (self.window.as_millis() as u64).div_ceil(1000)
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Admitted count in the identity's open window, 0 if none.
    pub fn count(&self, identity: &str) -> u64 {
        self.windows
            .get(&hash_identity(identity))
            .map_or(0, |w| w.count)
    }

    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            admitted: self.admitted,
            denied: self.denied,
            active_windows: self.windows.len(),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(60_000);

    #[test]
    fn test_quota_then_deny_then_new_window() {
        let mut limiter = RateLimiter::new(WINDOW, 3);
        let start = Instant::now();

        assert_eq!(limiter.admit_at("client", start), Admission::Allowed { remaining: 2 });
        assert_eq!(limiter.admit_at("client", start), Admission::Allowed { remaining: 1 });
        assert_eq!(limiter.admit_at("client", start), Admission::Allowed { remaining: 0 });
        assert_eq!(
            limiter.admit_at("client", start + Duration::from_millis(10)),
            Admission::Denied { retry_after_secs: 60 }
        );

        let later = start + WINDOW;
        assert_eq!(limiter.admit_at("client", later), Admission::Allowed { remaining: 2 });
    }

    #[test]
    fn test_denied_requests_do_not_consume_quota() {
        let mut limiter = RateLimiter::new(WINDOW, 1);
        let start = Instant::now();

        assert!(limiter.admit_at("client", start).is_allowed());
        for _ in 0..5 {
            assert!(!limiter.admit_at("client", start).is_allowed());
        }

        assert_eq!(limiter.count("client"), 1);
        let stats = limiter.stats();
        assert_eq!(stats.admitted, 1);
        assert_eq!(stats.denied, 5);
    }

    #[test]
    fn test_identities_do_not_share_quota() {
        let mut limiter = RateLimiter::new(WINDOW, 2);
        let now = Instant::now();

        limiter.admit_at("x", now);
        limiter.admit_at("x", now);
        assert!(!limiter.admit_at("x", now).is_allowed());

        assert_eq!(limiter.count("y"), 0);
        assert_eq!(limiter.admit_at("y", now), Admission::Allowed { remaining: 1 });
    }

    #[test]
    fn test_window_is_anchored_at_first_request() {
        let mut limiter = RateLimiter::new(WINDOW, 2);
        let start = Instant::now();

        limiter.admit_at("client", start);
        limiter.admit_at("client", start + Duration::from_secs(59));
        assert!(!limiter
            .admit_at("client", start + Duration::from_millis(59_999))
            .is_allowed());

        // Traffic late in the window does not extend it
        assert!(limiter.admit_at("client", start + WINDOW).is_allowed());
    }

    #[test]
    fn test_sweep_removes_quiet_windows() {
        let mut limiter = RateLimiter::new(WINDOW, 5);
        let start = Instant::now();

        limiter.admit_at("a", start);
        limiter.admit_at("b", start + Duration::from_secs(30));

        assert_eq!(limiter.sweep_expired_at(start + Duration::from_secs(59)), 0);
        assert_eq!(limiter.sweep_expired_at(start + WINDOW), 1);
        assert_eq!(limiter.count("a"), 0);
        assert_eq!(limiter.count("b"), 1);
        assert_eq!(limiter.stats().active_windows, 1);

        assert_eq!(limiter.sweep_expired_at(start + Duration::from_secs(90)), 1);
        assert_eq!(limiter.stats().active_windows, 0);
    }

    #[test]
    fn test_sweep_skips_reopened_window() {
        let mut limiter = RateLimiter::new(WINDOW, 5);
        let start = Instant::now();

        limiter.admit_at("a", start);
        // Lazily expired and reopened before any sweep ran
        limiter.admit_at("a", start + WINDOW + Duration::from_secs(1));

        assert_eq!(limiter.sweep_expired_at(start + WINDOW + Duration::from_secs(2)), 0);
        assert_eq!(limiter.count("a"), 1);

        assert_eq!(
            limiter.sweep_expired_at(start + WINDOW * 2 + Duration::from_secs(1)),
            1
        );
        assert_eq!(limiter.count("a"), 0);
    }

    #[test]
    fn test_zero_quota_denies_everything() {
        let mut limiter = RateLimiter::new(WINDOW, 0);

        assert_eq!(
            limiter.admit("client"),
            Admission::Denied { retry_after_secs: 60 }
        );
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(RateLimiter::new(Duration::from_millis(1500), 1).retry_after_secs(), 2);
        assert_eq!(RateLimiter::new(Duration::from_millis(1000), 1).retry_after_secs(), 1);
    }

    #[test]
    fn test_from_config() {
        let limiter = RateLimiter::from_config(&Config::default());
        assert_eq!(limiter.max_requests(), 100);
        assert_eq!(limiter.window(), WINDOW);
    }
}
