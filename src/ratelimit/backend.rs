//! Counter backend trait for abstracting remote and local counting.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::error::Result;

use super::key::RateLimitKey;

/// The result of one counter increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Counter value after this increment
    pub count: u64,
    /// Absolute epoch-millisecond time when the window resets
    pub reset_at_ms: u64,
    /// Whether this increment opened a fresh window
    pub just_created: bool,
}

/// Trait for counter backend implementations.
///
/// A backend has exactly one capability: increment a named counter and
/// report its current value, with the whole counter expiring `window` after
/// the first hit.
#[async_trait]
pub trait CounterBackend: Send + Sync {
    /// Increment the counter for `key`, arming a `window`-long expiry if
    /// this is the first hit of a fresh window.
    async fn increment_and_expire(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<CounterSnapshot>;
}

/// Current wall-clock time as epoch milliseconds.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
