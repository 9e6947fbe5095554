//! HTTP gateway for the store-rating service.
//!
//! Translates REST requests into calls on the embedded rating service and
//! renders every `AppError` as a status code plus JSON body.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::sync::Arc;

use tracing::info;

use common::{AppError, AppResult};
use rating_service_lib::{infra::Database, Services};

use crate::config::GatewayConfig;
use crate::routes::create_app;
use crate::state::AppState;

/// Connect to the database, apply pending migrations and serve HTTP until
/// the process is stopped.
pub async fn run_server(config: GatewayConfig) -> AppResult<()> {
    let db = Database::connect(&config.database).await?;
    info!("Database connected");

    let services = Services::from_connection(db.get_connection(), &config.jwt);
    let state = AppState::new(services, Arc::new(db));
    let app = create_app(state, config.cors_allow_origin.as_deref())?;

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;
    info!("Gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolves once `signal` fires. A handler that could not be installed keeps
/// the server running instead of stopping it.
async fn wait_for_shutdown<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to install shutdown handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
