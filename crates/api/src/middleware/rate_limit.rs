//! Process-local fixed-window rate limiter.
//!
//! Windows are anchored at the first request after expiry rather than on
//! wall-clock boundaries. State lives in process memory, so limits apply
//! per instance; a multi-instance deployment multiplies the effective limit
//! by the instance count.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use crestwood_core::types::Timestamp;

/// Outcome of a single rate-limit check.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window (0 when denied).
    pub remaining: u32,
    /// When the current window expires.
    pub reset_at: Timestamp,
}

impl RateLimitDecision {
    /// Seconds until the window resets, clamped to at least 1 so a
    /// `Retry-After` header is never zero or negative.
    pub fn retry_after_secs(&self, now: Timestamp) -> i64 {
        (self.reset_at - now).num_seconds().max(1)
    }
}

struct Window {
    started_at: Timestamp,
    count: u32,
}

/// Shared fixed-window counter keyed by an arbitrary string (client ip plus
/// route in practice).
#[derive(Default)]
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request against `key` and decide whether it is allowed.
    pub fn check(&self, key: &str, limit: u32, window: Duration) -> RateLimitDecision {
        self.check_at(key, limit, window, Utc::now())
    }

    /// Clock-injected variant of [`check`](Self::check).
    pub fn check_at(
        &self,
        key: &str,
        limit: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let entry = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now - entry.started_at >= window {
            entry.started_at = now;
            entry.count = 0;
        }
        let reset_at = entry.started_at + window;

        if entry.count >= limit {
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at,
            };
        }

        entry.count += 1;
        RateLimitDecision {
            allowed: true,
            remaining: limit - entry.count,
            reset_at,
        }
    }
}
