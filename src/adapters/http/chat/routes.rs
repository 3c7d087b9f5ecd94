//! HTTP routes for chat endpoints.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::{rate_limit_middleware, RateLimiterState};

use super::handlers::{get_crisis_resources, get_session, init_chat, send_message, ChatHandlers};

/// Creates the chat router. Only the two POST endpoints are rate limited.
pub fn chat_routes(handlers: ChatHandlers, limiter: RateLimiterState) -> Router {
    let limited = Router::new()
        .route("/init", post(init_chat))
        .route("/message", post(send_message))
        .route_layer(from_fn_with_state(limiter, rate_limit_middleware));

    Router::new()
        .route("/crisis/resources", get(get_crisis_resources))
        .route("/:session_id", get(get_session))
        .merge(limited)
        .with_state(handlers)
}
