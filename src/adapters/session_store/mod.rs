//! Session store adapters.
//!
//! - `InMemorySessionStore` - Process-local map, the only backend today
//! - `SessionSweeper` - Background task that expires idle sessions

mod in_memory;
mod sweeper;

pub use in_memory::InMemorySessionStore;
pub use sweeper::{SessionSweeper, SessionSweeperConfig};
