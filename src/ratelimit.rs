//! Per-identity sliding-window rate limiter.
//!
//! In-memory and per-process; limits reset on restart. Checks for the same
//! identity serialize on one mutex so two concurrent requests cannot both
//! read a stale count and slip past the limit.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Events older than this roll out of the window.
fn window() -> Duration {
    Duration::hours(1)
}

/// Per-action hourly quotas. Actions not listed here are never limited.
fn limit_for(action: &str) -> Option<usize> {
    match action {
        "upload" => Some(10),
        "search" => Some(50),
        _ => None,
    }
}

/// Sliding-window limiter keyed by client identity (typically an IP).
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<(DateTime<Utc>, String)>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether `identity` may perform `action` now. Allowed requests
    /// are recorded; rejected ones are not.
    pub fn is_allowed(&self, identity: &str, action: &str) -> (bool, String) {
        self.check_at(identity, action, Utc::now())
    }

    /// Clock-injectable form of [`is_allowed`](Self::is_allowed).
    pub fn check_at(
        &self,
        identity: &str,
        action: &str,
        now: DateTime<Utc>,
    ) -> (bool, String) {
        let Some(limit) = limit_for(action) else {
            return (true, String::new());
        };

        let cutoff = now - window();
        let mut requests = self.requests.lock();
        let events = requests.entry(identity.to_string()).or_default();

        // Lazily drop events that have left the window
        events.retain(|(ts, _)| *ts > cutoff);

        let action_count = events.iter().filter(|(_, act)| act == action).count();
        if action_count >= limit {
            return (
                false,
                format!("Rate limit exceeded. Maximum {limit} {action}s per hour."),
            );
        }

        events.push((now, action.to_string()));
        (true, String::new())
    }
}
