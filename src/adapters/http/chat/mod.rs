//! HTTP adapter for chat endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CrisisResourcesResponse, InitChatRequest, InitChatResponse, MessageResponse,
    SendMessageRequest, SendMessageResponse, SessionResponse, SessionView, UserInfoDto,
};
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
