//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;

pub use chat::{
    ChatError, ChatSettings, GetChatHistoryHandler, GetChatHistoryQuery,
    InitializeSessionCommand, InitializeSessionHandler, InitializeSessionResult,
    SendMessageCommand, SendMessageHandler, SendMessageResult,
};
