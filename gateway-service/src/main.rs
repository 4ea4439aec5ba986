use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

use gateway_service::{create_router, AppState, Settings};
use shared::database::initialize_database;
use shared::observability::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;

    // Initialize tracing
    init_logging(settings.logging.to_log_config()?).context("Failed to initialize logging")?;

    info!(
        "Starting Gateway Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Create database and users table if absent
    initialize_database(&settings.database)
        .await
        .context("Failed to initialize database")?;

    // Build store clients
    let state = AppState::from_settings(&settings).await;
    info!("Store clients initialized");

    let app = create_router(state, settings.server.max_upload_bytes);

    let addr = settings.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Gateway Service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Gateway Service shut down gracefully");
    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
