use support_chat::config::AppConfig;
use support_chat::observability::init_tracing;
use support_chat::startup;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(&config.server.log_level, config.is_production());

    config.validate().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    startup::run(config).await
}
