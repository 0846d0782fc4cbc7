//! Limiter Module
//!
//! Per-client admission control run before any cache or data access.

mod hash;
mod rate_limiter;

pub use hash::hash_identity;
pub use rate_limiter::{Admission, LimiterStats, RateLimitWindow, RateLimiter};
