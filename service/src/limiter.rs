//! In-process request rate limiting.

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Fixed-window rate limiter shared by all request handlers of a process.
///
/// Every logical action carries its own key (`"login:1.2.3.4"`,
/// `"chat:<user-id>"`), so quotas of unrelated actions never interfere.
/// Counters live in memory only and reset on process restart.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
    /// Per-key windows of this [`RateLimiter`].
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

/// Single fixed window of a [`RateLimiter`] key.
#[derive(Clone, Copy, Debug)]
struct Window {
    /// Number of requests admitted in this [`Window`] so far.
    count: u32,

    /// [`Instant`] when this [`Window`] ends.
    ends_at: Instant,
}

impl RateLimiter {
    /// Checks whether one more request under the given `key` fits into the
    /// current window, and records it if so.
    ///
    /// A request arriving after the window end opens a fresh window and is
    /// always admitted.
    pub fn admit(
        &self,
        key: impl Into<String>,
        max_requests: u32,
        window: Duration,
    ) -> bool {
        let now = Instant::now();
        let mut windows =
            self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        match windows.entry(key.into()) {
            Entry::Vacant(slot) => {
                drop(slot.insert(Window {
                    count: 1,
                    ends_at: now + window,
                }));
                true
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                if now > current.ends_at {
                    *current = Window {
                        count: 1,
                        ends_at: now + window,
                    };
                    true
                } else if current.count >= max_requests {
                    false
                } else {
                    current.count += 1;
                    true
                }
            }
        }
    }
}

#[cfg(test)]
mod admit_spec {
    use std::{thread, time::Duration};

    use super::RateLimiter;

    #[test]
    fn admits_up_to_the_quota_then_rejects() {
        let limiter = RateLimiter::default();

        for _ in 0..5 {
            assert!(limiter.admit("login:1.2.3.4", 5, Duration::from_secs(60)));
        }
        assert!(!limiter.admit("login:1.2.3.4", 5, Duration::from_secs(60)));
        assert!(!limiter.admit("login:1.2.3.4", 5, Duration::from_secs(60)));
    }

    #[test]
    fn tracks_keys_independently() {
        let limiter = RateLimiter::default();

        assert!(limiter.admit("login:1.2.3.4", 1, Duration::from_secs(60)));
        assert!(!limiter.admit("login:1.2.3.4", 1, Duration::from_secs(60)));
        assert!(limiter.admit("login:5.6.7.8", 1, Duration::from_secs(60)));
        assert!(limiter.admit("chat:1.2.3.4", 1, Duration::from_secs(60)));
    }

    #[test]
    fn opens_a_fresh_window_after_expiry() {
        let limiter = RateLimiter::default();
        let window = Duration::from_millis(30);

        assert!(limiter.admit("register:1.2.3.4", 1, window));
        assert!(!limiter.admit("register:1.2.3.4", 1, window));

        thread::sleep(window + Duration::from_millis(10));

        assert!(limiter.admit("register:1.2.3.4", 1, window));
    }
}
