use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use api::{app, build_state, config::ApiConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting invoice API");

    let config = ApiConfig::from_env()?;
    info!("Using {:?} storage", config.storage);

    let state = build_state(&config).await?;

    if state.is_healthy().await {
        info!("Storage connection successful");
    } else {
        anyhow::bail!("Failed to reach storage");
    }

    let app = app(state, &config.server);

    let addr = config.server.bind_address()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Invoice API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Invoice API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
