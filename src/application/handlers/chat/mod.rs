//! Chat handlers - the conversation orchestrator.
//!
//! Coordinates crisis detection, context building, reply suggestions, the
//! session store and the completion provider for each chat operation.

mod completion;
mod errors;
mod get_chat_history;
mod initialize_session;
mod send_message;
mod settings;

pub use errors::ChatError;
pub use get_chat_history::{GetChatHistoryHandler, GetChatHistoryQuery};
pub use initialize_session::{
    InitializeSessionCommand, InitializeSessionHandler, InitializeSessionResult,
};
pub use send_message::{SendMessageCommand, SendMessageHandler, SendMessageResult};
pub use settings::ChatSettings;
