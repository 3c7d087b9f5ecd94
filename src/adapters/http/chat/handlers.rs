//! HTTP handlers for chat endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::{
    ChatError, GetChatHistoryHandler, GetChatHistoryQuery, InitializeSessionCommand,
    InitializeSessionHandler, SendMessageCommand, SendMessageHandler,
};
use crate::adapters::http::error::ErrorResponse;
use crate::domain::crisis::crisis_resources;
use crate::domain::foundation::SessionId;

use super::dto::{
    CrisisResourcesResponse, InitChatRequest, InitChatResponse, SendMessageRequest,
    SendMessageResponse, SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    init_handler: Arc<InitializeSessionHandler>,
    send_handler: Arc<SendMessageHandler>,
    history_handler: Arc<GetChatHistoryHandler>,
    expose_error_details: bool,
}

impl ChatHandlers {
    pub fn new(
        init_handler: Arc<InitializeSessionHandler>,
        send_handler: Arc<SendMessageHandler>,
        history_handler: Arc<GetChatHistoryHandler>,
    ) -> Self {
        Self {
            init_handler,
            send_handler,
            history_handler,
            expose_error_details: false,
        }
    }

    /// Include diagnostic `details` in error bodies (development only).
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/chat/init - Open a session and greet the user
///
/// An empty body is treated as `{}`.
pub async fn init_chat(State(handlers): State<ChatHandlers>, body: Bytes) -> Response {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        InitChatRequest::default()
    } else {
        match serde_json::from_slice::<InitChatRequest>(&body) {
            Ok(request) => request,
            Err(e) => {
                return ErrorResponse::invalid_json()
                    .with_details(handlers.expose_error_details, e.to_string())
                    .into_response()
            }
        }
    };

    let cmd = InitializeSessionCommand {
        profile: request.user_info.unwrap_or_default().into(),
    };

    match handlers.init_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(InitChatResponse::from(result))).into_response(),
        Err(e) => handle_chat_error(e, handlers.expose_error_details),
    }
}

/// POST /api/chat/message - Process one user message
pub async fn send_message(
    State(handlers): State<ChatHandlers>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response {
    let expose = handlers.expose_error_details;
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return ErrorResponse::invalid_json()
                .with_details(expose, rejection.body_text())
                .into_response()
        }
    };

    let (Some(raw_id), Some(message)) = (
        req.session_id.filter(|s| !s.trim().is_empty()),
        req.message.filter(|m| !m.trim().is_empty()),
    ) else {
        return ErrorResponse::validation("Session ID and message are required").into_response();
    };

    let Ok(session_id) = raw_id.trim().parse::<SessionId>() else {
        return ErrorResponse::session_expired()
            .with_details(expose, format!("Malformed session id: {}", raw_id))
            .into_response();
    };

    let cmd = SendMessageCommand {
        session_id,
        text: message,
    };

    match handlers.send_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(SendMessageResponse::from(result))).into_response(),
        Err(e) => handle_chat_error(e, expose),
    }
}

/// GET /api/chat/:session_id - Full transcript of a session
pub async fn get_session(
    State(handlers): State<ChatHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return ErrorResponse::session_expired().into_response();
    };

    match handlers
        .history_handler
        .handle(GetChatHistoryQuery { session_id })
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_chat_error(e, handlers.expose_error_details),
    }
}

/// GET /api/chat/crisis/resources - Static hotline directory
pub async fn get_crisis_resources() -> Json<CrisisResourcesResponse> {
    Json(CrisisResourcesResponse {
        resources: crisis_resources(),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_chat_error(error: ChatError, expose: bool) -> Response {
    if let ChatError::Internal(ref msg) = error {
        error!(error = %msg, "Chat request failed");
    }
    ErrorResponse::from_chat_error(&error, expose).into_response()
}
