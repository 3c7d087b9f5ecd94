//! Rate limiter adapters.
//!
//! Implementations of the RateLimiter port.
//!
//! - `InMemoryRateLimiter` - Sliding-window log for single-process deployments

mod in_memory;

pub use in_memory::InMemoryRateLimiter;
