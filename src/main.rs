use std::sync::Arc;
use storefront::config::StorefrontConfig;
use storefront::http::{build_router, AppState};
use storefront::lifecycle::{setup_tracing, StorefrontSystem};
use storefront::payments::{CardCapability, SimulatedMpesa};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = StorefrontConfig::from_env().map_err(|e| e.to_string())?;
    let card = CardCapability::from_config(&config).map_err(|e| e.to_string())?;

    let system = StorefrontSystem::new(config.store_timeout);
    if config.seed_catalog {
        system.seed_catalog().await.map_err(|e| e.to_string())?;
    }

    let state = AppState::new(&system, card, Arc::new(SimulatedMpesa), &config);
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|e| format!("bind {} failed: {e}", config.bind))?;
    info!(bind = %config.bind, "storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))?;

    // The router (and its clients) is dropped once serve returns.
    system.shutdown().await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
