//! Chat domain - sessions, messages, prompt assembly and reply selection.

mod context;
mod fallback;
mod message;
mod profile;
mod session;
mod suggestions;

pub use context::{
    template_welcome, welcome_context, ContextBuilder, DEFAULT_HISTORY_WINDOW, SYSTEM_PROMPT,
};
pub use fallback::{FallbackKind, EMPTY_REPLY_TEXT};
pub use message::{ChatMessage, Priority, SenderRole};
pub use profile::{SupportType, UserProfile};
pub use session::ChatSession;
pub use suggestions::{
    fallback_replies, suggest_replies, welcome_replies, ReplyCategory, FALLBACK_REPLIES,
    GENERIC_REPLIES, REPLY_CATEGORIES,
};
