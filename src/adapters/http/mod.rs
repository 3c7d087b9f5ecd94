//! HTTP adapters - REST API implementations.
//!
//! `build_router` assembles the full API:
//!
//! | Route | Handler |
//! |-------|---------|
//! | `POST /api/chat/init` | open a session (rate limited) |
//! | `POST /api/chat/message` | one user turn (rate limited) |
//! | `GET /api/chat/:session_id` | transcript |
//! | `GET /api/chat/crisis/resources` | hotline directory |
//! | `GET /api/health` | liveness |

pub mod chat;
pub mod error;
pub mod health;
pub mod middleware;

pub use chat::{chat_routes, ChatHandlers};
pub use error::ErrorResponse;
pub use health::{health_routes, HealthState};

use middleware::RateLimiterState;

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyHeader, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::application::{
    ChatSettings, GetChatHistoryHandler, InitializeSessionHandler, SendMessageHandler,
};
use crate::config::ServerConfig;
use crate::ports::{AIProvider, RateLimiter, SessionStore};

/// Shared dependencies for the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub provider: Arc<dyn AIProvider>,
    pub limiter: Arc<dyn RateLimiter>,
    pub settings: ChatSettings,
}

/// Builds the application router with tracing, CORS, timeout and panic layers.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let chat_handlers = ChatHandlers::new(
        Arc::new(InitializeSessionHandler::new(
            state.store.clone(),
            state.provider.clone(),
            state.settings.clone(),
        )),
        Arc::new(SendMessageHandler::new(
            state.store.clone(),
            state.provider.clone(),
            state.settings.clone(),
        )),
        Arc::new(GetChatHistoryHandler::new(state.store.clone())),
    )
    .with_error_details(server.exposes_error_details());
    let limiter = RateLimiterState::new(state.limiter.clone())
        .with_trusted_proxy_headers(server.trust_proxy_headers);

    Router::new()
        .nest("/api/chat", chat_routes(chat_handlers, limiter))
        .nest(
            "/api/health",
            health_routes(HealthState::new(state.store, state.provider)),
        )
        .fallback(route_not_found)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

async fn route_not_found(method: Method, uri: Uri) -> Response {
    ErrorResponse::route_not_found(method.as_str(), uri.path()).into_response()
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");
    ErrorResponse::internal().into_response()
}

/// Permissive when no origins are configured; otherwise an explicit list.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AnyHeader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_handler_returns_generic_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn cors_layer_builds_for_listed_origins() {
        let server = ServerConfig {
            cors_origins: Some("https://a.example, bad\u{1}origin".to_string()),
            ..Default::default()
        };
        let _ = cors_layer(&server);
    }
}
