use std::path::PathBuf;
use std::sync::Arc;

use academy::config::AppConfig;
use academy::db::SqliteClassStore;
use academy::server::create_router;
use academy::types::AppState;
use anyhow::Context;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            AppConfig::load_from_file(&path)?
        }
        None => {
            warn!("No configuration file given, using defaults");
            AppConfig::default()
        }
    };

    let store = SqliteClassStore::new(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path))?;
    info!(
        "Opened class store at {} (instructor buffer: {} min)",
        config.database_path, config.checker.instructor_buffer_minutes
    );

    let address = config.bind_address();
    let state = Arc::new(AppState::new(config, store));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
