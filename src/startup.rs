//! Wires configuration into adapters and serves the API.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use crate::adapters::ai::build_provider;
use crate::adapters::http::{build_router, AppState};
use crate::adapters::rate_limiter::InMemoryRateLimiter;
use crate::adapters::session_store::{InMemorySessionStore, SessionSweeper, SessionSweeperConfig};
use crate::application::ChatSettings;
use crate::config::AppConfig;

/// Builds the shared state from configuration.
pub fn build_state(config: &AppConfig) -> (AppState, Arc<InMemorySessionStore>) {
    let store = Arc::new(
        InMemorySessionStore::new().with_max_messages(config.chat.max_stored_messages),
    );
    let state = AppState {
        store: store.clone(),
        provider: build_provider(&config.ai),
        limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
        settings: ChatSettings::from_config(config),
    };
    (state, store)
}

/// Binds, serves until a shutdown signal, then stops the sweeper.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let addr = config
        .server
        .socket_addr()
        .map_err(|e| std::io::Error::other(format!("Configuration error: {}", e)))?;

    let (state, store) = build_state(&config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = SessionSweeper::new(
        store,
        SessionSweeperConfig::default()
            .with_interval(config.chat.sweep_interval())
            .with_max_idle(config.chat.session_ttl()),
    );
    let sweeper_handle = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    let app = build_router(state, &config.server);
    let listener = TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        environment = ?config.server.environment,
        "Support chat server listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    let _ = shutdown_tx.send(true);
    let _ = sweeper_handle.await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_without_key_uses_disabled_provider() {
        let (state, _) = build_state(&AppConfig::default());
        assert!(!state.provider.is_configured());
    }
}
