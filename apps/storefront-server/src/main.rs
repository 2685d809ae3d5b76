//! # Storefront Server
//!
//! HTTP server composing the storefront shell's Session Context.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Server                                │
//! │                                                                         │
//! │  Browser ───► HTTP (3000) ───► ShellComposer ───► Shop API (GraphQL)   │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                               Session cookie                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront_backend::ShopBackend;
use storefront_server::{build_router, AppState, ServerConfig};
use storefront_shell::{ShellComposer, StorefrontConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting storefront server...");

    // Load configuration
    let server_config = ServerConfig::load()?;
    let storefront_config = StorefrontConfig::load(server_config.storefront_config.clone())?;
    info!(
        api_url = %storefront_config.backend.api_url,
        default_channel = %storefront_config.default_channel_token(),
        tenants = server_config.tenants.len(),
        "Configuration loaded"
    );

    // Build the composer
    let backend = ShopBackend::new(&storefront_config.backend_config())?;
    let composer = ShellComposer::new(Arc::new(backend), &storefront_config)?;
    let state = Arc::new(AppState::new(composer, server_config.tenants.clone()));

    // Start server
    let addr = server_config.listen_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
