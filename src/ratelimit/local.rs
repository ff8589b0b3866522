//! In-process fallback counter.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::error::Result;

use super::backend::{now_millis, CounterBackend, CounterSnapshot};
use super::key::RateLimitKey;

/// One key's counter state.
#[derive(Debug, Clone, Copy)]
struct CounterEntry {
    /// Hits counted in the current window
    count: u64,
    /// Absolute epoch-millisecond time when the window resets
    reset_at_ms: u64,
}

/// An in-process counter backend.
///
/// Counting is atomic within this process only; it does not coordinate
/// across instances. It exists as an availability fallback for when the
/// remote counter service is unconfigured or unreachable.
///
/// Stale entries are reclaimed lazily: the next increment for the same key
/// past its reset time overwrites the entry. There is no background
/// eviction, so high-cardinality key spaces grow the map until revisited.
pub struct LocalCounterBackend {
    entries: DashMap<RateLimitKey, CounterEntry>,
}

impl LocalCounterBackend {
    /// Create a new local counter backend.
    ///
    /// Construct one per process and share it by reference; per-call
    /// construction would reset every window.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Increment the counter for `key` within the current window.
    ///
    /// Infallible: the map is owned by this process and cannot be
    /// unreachable.
    pub fn increment(&self, key: &RateLimitKey, window: Duration) -> CounterSnapshot {
        let now = now_millis();
        let window_ms = window.as_millis() as u64;

        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if now > entry.reset_at_ms {
                    // Window elapsed; re-arm with this hit as the first.
                    *entry = CounterEntry {
                        count: 1,
                        reset_at_ms: now + window_ms,
                    };
                    CounterSnapshot {
                        count: 1,
                        reset_at_ms: entry.reset_at_ms,
                        just_created: true,
                    }
                } else {
                    entry.count += 1;
                    CounterSnapshot {
                        count: entry.count,
                        reset_at_ms: entry.reset_at_ms,
                        just_created: false,
                    }
                }
            }
            Entry::Vacant(vacant) => {
                debug!(key = %key, "Creating local counter entry");
                let entry = vacant.insert(CounterEntry {
                    count: 1,
                    reset_at_ms: now + window_ms,
                });
                CounterSnapshot {
                    count: entry.count,
                    reset_at_ms: entry.reset_at_ms,
                    just_created: true,
                }
            }
        }
    }

    /// Get the number of live counter entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all counters.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for LocalCounterBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterBackend for LocalCounterBackend {
    async fn increment_and_expire(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<CounterSnapshot> {
        Ok(self.increment(key, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key(name: &str) -> RateLimitKey {
        RateLimitKey::compose([Some("test"), Some(name)])
    }

    #[test]
    fn test_first_increment_creates_entry() {
        let backend = LocalCounterBackend::new();
        let snapshot = backend.increment(&test_key("a"), Duration::from_secs(60));

        assert_eq!(snapshot.count, 1);
        assert!(snapshot.just_created);
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_increments_accumulate_within_window() {
        let backend = LocalCounterBackend::new();
        let key = test_key("a");

        backend.increment(&key, Duration::from_secs(60));
        let second = backend.increment(&key, Duration::from_secs(60));
        let third = backend.increment(&key, Duration::from_secs(60));

        assert_eq!(second.count, 2);
        assert!(!second.just_created);
        assert_eq!(third.count, 3);
    }

    #[test]
    fn test_reset_at_is_stable_within_window() {
        let backend = LocalCounterBackend::new();
        let key = test_key("a");

        let first = backend.increment(&key, Duration::from_secs(60));
        let second = backend.increment(&key, Duration::from_secs(60));

        assert_eq!(first.reset_at_ms, second.reset_at_ms);
    }

    #[test]
    fn test_separate_keys_have_separate_counters() {
        let backend = LocalCounterBackend::new();

        backend.increment(&test_key("a"), Duration::from_secs(60));
        backend.increment(&test_key("a"), Duration::from_secs(60));
        let other = backend.increment(&test_key("b"), Duration::from_secs(60));

        assert_eq!(other.count, 1);
        assert_eq!(backend.len(), 2);
    }

    #[tokio::test]
    async fn test_window_rearms_after_elapse() {
        let backend = LocalCounterBackend::new();
        let key = test_key("a");
        let window = Duration::from_millis(50);

        backend.increment(&key, window);
        backend.increment(&key, window);

        tokio::time::sleep(Duration::from_millis(80)).await;

        let fresh = backend.increment(&key, window);
        assert_eq!(fresh.count, 1);
        assert!(fresh.just_created);
        // Lazy reclamation overwrites in place, it does not add an entry.
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_clear_counters() {
        let backend = LocalCounterBackend::new();
        backend.increment(&test_key("a"), Duration::from_secs(60));
        assert_eq!(backend.len(), 1);

        backend.clear();
        assert!(backend.is_empty());
    }
}
