//! Rate limiting logic and state management.

pub mod backend;
pub mod catalog;
pub mod fallback;
pub mod key;
pub mod limiter;
pub mod local;
pub mod policy;
pub mod remote;

pub use backend::{CounterBackend, CounterSnapshot};
pub use catalog::PolicyCatalog;
pub use fallback::FallbackBackend;
pub use key::RateLimitKey;
pub use limiter::{LimitOutcome, RateLimiter, Rejection, RejectionBody};
pub use local::LocalCounterBackend;
pub use policy::{decide, LimitPolicy, LimitResult};
pub use remote::RemoteCounterBackend;
