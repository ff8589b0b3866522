//! Core rate limiter facade.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::TurnstileConfig;
use crate::error::Result;

use super::backend::{now_millis, CounterBackend};
use super::fallback::FallbackBackend;
use super::key::RateLimitKey;
use super::local::LocalCounterBackend;
use super::policy::{decide, LimitPolicy, LimitResult};
use super::remote::RemoteCounterBackend;

/// HTTP status of a terminal rejection.
pub const REJECTION_STATUS: u16 = 429;
/// Header carrying the retry hint on a terminal rejection.
pub const RETRY_AFTER_HEADER: &str = "Retry-After";

/// Body of a terminal rejection response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectionBody {
    /// Fixed, caller-facing error message
    pub error: &'static str,
}

/// A ready-to-send "too many requests" response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// HTTP status code, always 429
    pub status: u16,
    /// Response body
    pub body: RejectionBody,
    /// Whole seconds until the window resets, rounded up
    pub retry_after_secs: u64,
}

impl Rejection {
    fn new(reset_at_ms: u64, now: u64) -> Self {
        Self {
            status: REJECTION_STATUS,
            body: RejectionBody {
                error: "Rate limit exceeded",
            },
            retry_after_secs: reset_at_ms.saturating_sub(now).div_ceil(1000),
        }
    }

    /// The body serialized as a JSON string.
    pub fn body_json(&self) -> String {
        // A struct of one static string field cannot fail to serialize.
        serde_json::to_string(&self.body).unwrap_or_default()
    }
}

/// The outcome of one limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitOutcome {
    /// Within the limit
    Allowed(LimitResult),
    /// Over the limit; the caller decides what to do with it
    Limited(LimitResult),
    /// Over the limit under a fail-closed policy; send this response as-is
    Rejected(Rejection),
}

impl LimitOutcome {
    /// Whether the hit was within the limit.
    pub fn is_allowed(&self) -> bool {
        matches!(self, LimitOutcome::Allowed(_))
    }

    /// The structured result, when one was produced.
    pub fn result(&self) -> Option<&LimitResult> {
        match self {
            LimitOutcome::Allowed(result) | LimitOutcome::Limited(result) => Some(result),
            LimitOutcome::Rejected(_) => None,
        }
    }
}

/// The rate limiter facade.
///
/// Orchestrates key composition, the remote-with-fallback counter, and the
/// fixed-window decision. A check never returns an error: remote failures
/// degrade to in-process counting for that single call.
///
/// Construct one per process and share it; the in-process fallback counters
/// live inside it.
pub struct RateLimiter {
    backend: FallbackBackend,
}

impl RateLimiter {
    /// Create a rate limiter from configuration.
    ///
    /// An absent remote section routes every check to in-process counting.
    pub fn new(config: &TurnstileConfig) -> Result<Self> {
        let remote: Option<Arc<dyn CounterBackend>> = match &config.remote {
            Some(remote_config) => Some(Arc::new(RemoteCounterBackend::new(remote_config)?)),
            None => None,
        };

        Ok(Self::with_backends(
            remote,
            Arc::new(LocalCounterBackend::new()),
        ))
    }

    /// Create a rate limiter over explicit backends.
    pub fn with_backends(
        remote: Option<Arc<dyn CounterBackend>>,
        local: Arc<LocalCounterBackend>,
    ) -> Self {
        Self {
            backend: FallbackBackend::new(remote, local),
        }
    }

    /// The backend composition, exposing fallback observability.
    pub fn backend(&self) -> &FallbackBackend {
        &self.backend
    }

    /// Check and count one hit for the caller identified by `key_parts`.
    ///
    /// `None` and empty parts are dropped from the key; see
    /// [`RateLimitKey::compose`].
    pub async fn limit<I, S>(&self, key_parts: I, policy: &LimitPolicy) -> LimitOutcome
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let key = RateLimitKey::compose(key_parts);

        trace!(
            key = %key,
            limit = policy.limit,
            window_ms = policy.window.as_millis() as u64,
            "Checking rate limit"
        );

        let snapshot = self.backend.increment(&key, policy.window).await;
        let result = decide(snapshot.count, policy.limit, snapshot.reset_at_ms);

        if result.ok {
            return LimitOutcome::Allowed(result);
        }

        debug!(
            key = %key,
            count = snapshot.count,
            limit = policy.limit,
            "Rate limit exceeded"
        );

        if policy.fail_closed {
            LimitOutcome::Rejected(Rejection::new(result.reset_at_ms, now_millis()))
        } else {
            LimitOutcome::Limited(result)
        }
    }
}
