//! Named limiter profiles for specific call sites.

use std::sync::Arc;
use std::time::Duration;

use super::limiter::{LimitOutcome, RateLimiter};
use super::policy::LimitPolicy;

/// Registration attempts per caller IP.
const REGISTER: LimitPolicy = LimitPolicy::new(5, Duration::from_secs(60), true);
/// Login attempts per caller IP.
const LOGIN: LimitPolicy = LimitPolicy::new(10, Duration::from_secs(60), true);
/// Password-reset requests per (caller IP, target email) pair.
const PASSWORD_REQUEST: LimitPolicy = LimitPolicy::new(3, Duration::from_secs(3600), true);
/// Verification resends per (caller IP, target email) pair.
const RESEND_VERIFY: LimitPolicy = LimitPolicy::new(3, Duration::from_secs(3600), true);

/// Pre-configured limiter profiles for abuse-sensitive call sites.
///
/// Each profile binds a key shape, a limit, and a window, and fails closed:
/// over-limit callers get a ready-to-send 429. Adding a call site means
/// adding one method here, not touching the facade.
pub struct PolicyCatalog {
    limiter: Arc<RateLimiter>,
}

impl PolicyCatalog {
    /// Create a catalog over a shared rate limiter.
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }

    /// Limit registration attempts from one IP.
    pub async fn register(&self, ip: &str) -> LimitOutcome {
        self.limiter.limit([Some("register"), Some(ip)], &REGISTER).await
    }

    /// Limit login attempts from one IP.
    pub async fn login(&self, ip: &str) -> LimitOutcome {
        self.limiter.limit([Some("login"), Some(ip)], &LOGIN).await
    }

    /// Limit password-reset requests from one IP for one target email.
    pub async fn password_request(&self, ip: &str, email: &str) -> LimitOutcome {
        self.limiter
            .limit([Some("pwdreq"), Some(ip), Some(email)], &PASSWORD_REQUEST)
            .await
    }

    /// Limit verification-email resends from one IP for one target email.
    pub async fn resend_verify(&self, ip: &str, email: &str) -> LimitOutcome {
        self.limiter
            .limit([Some("resend"), Some(ip), Some(email)], &RESEND_VERIFY)
            .await
    }
}
