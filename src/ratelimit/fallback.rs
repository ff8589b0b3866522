//! Remote-with-local-fallback backend composition.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{trace, warn};

use crate::error::Result;

use super::backend::{CounterBackend, CounterSnapshot};
use super::key::RateLimitKey;
use super::local::LocalCounterBackend;

/// A backend that prefers the remote counter and degrades to local counting.
///
/// Any remote failure is swallowed for that single call: no retry, no
/// queuing, no error surfaced to the caller. The downgrade is observable
/// through [`FallbackBackend::fallback_activations`] and a `warn` event,
/// since an active fallback means the cross-instance guarantee is running
/// on per-process counting.
pub struct FallbackBackend {
    remote: Option<Arc<dyn CounterBackend>>,
    local: Arc<LocalCounterBackend>,
    fallback_activations: AtomicU64,
}

impl FallbackBackend {
    /// Create a fallback composition over an optional remote backend and a
    /// process-wide local backend.
    pub fn new(remote: Option<Arc<dyn CounterBackend>>, local: Arc<LocalCounterBackend>) -> Self {
        Self {
            remote,
            local,
            fallback_activations: AtomicU64::new(0),
        }
    }

    /// Whether a remote backend is configured.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Number of times a configured remote backend failed and a call was
    /// served by local counting instead.
    pub fn fallback_activations(&self) -> u64 {
        self.fallback_activations.load(Ordering::Relaxed)
    }

    /// The local backend behind this composition.
    pub fn local(&self) -> &Arc<LocalCounterBackend> {
        &self.local
    }

    /// Increment the counter for `key`, never failing.
    ///
    /// Tries the remote backend when configured; on any error falls through
    /// to the local backend, whose counting is infallible.
    pub async fn increment(&self, key: &RateLimitKey, window: Duration) -> CounterSnapshot {
        if let Some(remote) = &self.remote {
            match remote.increment_and_expire(key, window).await {
                Ok(snapshot) => return snapshot,
                Err(error) => {
                    self.fallback_activations.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        key = %key,
                        error = %error,
                        "Remote counter unavailable, falling back to local counting"
                    );
                }
            }
        } else {
            trace!(key = %key, "No remote counter configured, counting locally");
        }

        self.local.increment(key, window)
    }
}

#[async_trait]
impl CounterBackend for FallbackBackend {
    async fn increment_and_expire(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<CounterSnapshot> {
        Ok(self.increment(key, window).await)
    }
}
