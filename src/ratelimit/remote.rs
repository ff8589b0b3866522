//! Remote atomic counter backend over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::trace;

use crate::config::RemoteCounterConfig;
use crate::error::{Result, TurnstileError};

use super::backend::{now_millis, CounterBackend, CounterSnapshot};
use super::key::RateLimitKey;

/// Response body of the increment endpoint.
#[derive(Debug, Deserialize)]
struct IncrResponse {
    /// Counter value after the increment
    result: u64,
}

/// A counter backend that talks to an external atomic counter service.
///
/// The service exposes two endpoints, both authenticated with a bearer
/// token: `POST /incr/{key}` returning the post-increment count, and
/// `POST /pexpire/{key}/{ms}` arming the key's time-to-live.
///
/// Counting is globally atomic: the increment is a single round trip, so
/// concurrent callers from different instances always observe distinct
/// counts. The expiry is a second call issued only when the increment
/// reports count 1; a crash between the two calls leaves a counter without
/// a TTL until the service's own defaults reclaim it, which narrows but
/// never bypasses the limit.
pub struct RemoteCounterBackend {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RemoteCounterBackend {
    /// Create a new remote counter backend from configuration.
    pub fn new(config: &RemoteCounterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Issue an authenticated POST and fail on any non-success status.
    async fn post(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TurnstileError::RemoteStatus(status));
        }

        Ok(response)
    }
}

#[async_trait]
impl CounterBackend for RemoteCounterBackend {
    async fn increment_and_expire(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<CounterSnapshot> {
        let window_ms = window.as_millis() as u64;

        let body: IncrResponse = self.post(&format!("incr/{}", key)).await?.json().await?;

        trace!(key = %key, count = body.result, "Remote counter incremented");

        let just_created = body.result == 1;
        if just_created {
            // First hit of a fresh window: arm the TTL.
            self.post(&format!("pexpire/{}/{}", key, window_ms)).await?;
        }

        // The service exposes no TTL read, so report the window's upper
        // bound as the reset time.
        Ok(CounterSnapshot {
            count: body.result,
            reset_at_ms: now_millis() + window_ms,
            just_created,
        })
    }
}
