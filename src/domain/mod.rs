//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `crisis` - Keyword crisis detection, crisis copy and resources
//! - `chat` - Sessions, messages, context assembly and quick replies

pub mod chat;
pub mod crisis;
pub mod foundation;
