//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (init, send) mutate sessions; the history query only reads.

pub mod handlers;

pub use handlers::{
    ChatError, ChatSettings, GetChatHistoryHandler, GetChatHistoryQuery,
    InitializeSessionCommand, InitializeSessionHandler, InitializeSessionResult,
    SendMessageCommand, SendMessageHandler, SendMessageResult,
};
