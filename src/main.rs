//! secret-link - HTTP Server Entry Point
//!
//! Starts the HTTP server that serves the encrypt/decrypt pages and API.

use secret_link::{api, config::Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secret_link=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: public_base_url={}, dev_mode={}",
        config
            .public_base_url
            .as_deref()
            .unwrap_or("(from Host header)"),
        config.dev_mode
    );

    info!("Starting server on {}", config.bind_addr());
    api::serve(config).await?;

    Ok(())
}
