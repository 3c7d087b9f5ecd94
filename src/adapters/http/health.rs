//! Liveness endpoint.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::domain::foundation::Timestamp;
use crate::ports::{AIProvider, SessionStore};

/// State for the health route.
#[derive(Clone)]
pub struct HealthState {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn AIProvider>,
}

impl HealthState {
    pub fn new(store: Arc<dyn SessionStore>, provider: Arc<dyn AIProvider>) -> Self {
        Self { store, provider }
    }
}

/// Response for `GET /api/health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub active_sessions: usize,
    pub provider_configured: bool,
    pub provider: String,
}

/// GET /api/health
pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    let active_sessions = state.store.count().await.unwrap_or_else(|e| {
        warn!(error = %e, "Session count unavailable");
        0
    });

    Json(HealthResponse {
        status: "healthy",
        timestamp: Timestamp::now().as_datetime().to_rfc3339(),
        active_sessions,
        provider_configured: state.provider.is_configured(),
        provider: state.provider.provider_info().name,
    })
}

pub fn health_routes(state: HealthState) -> Router {
    Router::new().route("/", get(health)).with_state(state)
}
