//! Fixed-window policy and decision types.

use std::time::Duration;

/// Configuration for one call site's limit.
#[derive(Debug, Clone, Copy)]
pub struct LimitPolicy {
    /// Maximum hits allowed in the window
    pub limit: u64,
    /// Window length
    pub window: Duration,
    /// Whether exceeding the limit yields a terminal rejection instead of a
    /// structured result
    pub fail_closed: bool,
}

impl LimitPolicy {
    /// Create a new limit policy.
    pub const fn new(limit: u64, window: Duration, fail_closed: bool) -> Self {
        Self {
            limit,
            window,
            fail_closed,
        }
    }
}

/// The outcome of classifying one counter value against a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitResult {
    /// Whether the hit is within the limit
    pub ok: bool,
    /// Quota left in the current window
    pub remaining: u64,
    /// Absolute epoch-millisecond time when the window resets
    pub reset_at_ms: u64,
}

/// Classify a counter value against a limit.
///
/// Pure function: it only compares numbers a backend already produced.
pub fn decide(count: u64, limit: u64, reset_at_ms: u64) -> LimitResult {
    LimitResult {
        ok: count <= limit,
        remaining: limit.saturating_sub(count),
        reset_at_ms,
    }
}
