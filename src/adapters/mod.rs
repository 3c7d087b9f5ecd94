//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion providers (OpenAI, Gemini, test doubles)
//! - `session_store` - In-memory sessions and the idle sweeper
//! - `rate_limiter` - Sliding-window request limits
//! - `http` - axum routes, DTOs and middleware

pub mod ai;
pub mod http;
pub mod rate_limiter;
pub mod session_store;
