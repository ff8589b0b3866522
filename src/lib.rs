//! Turnstile - Shared Abuse-Prevention Rate Limiting
//!
//! This crate implements a fixed-window rate limiter that produces a single,
//! consistent allow/reject decision for a caller identity across many
//! stateless request-handling processes. Counting happens in a remote atomic
//! counter service reachable over HTTP; when that service is unconfigured or
//! unreachable, the limiter degrades to in-process counting so the
//! application stays available.

pub mod config;
pub mod error;
pub mod ratelimit;
