//! HTTP middleware for axum.
//!
//! - `rate_limit` - Global and per-IP request limits

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiterState};
