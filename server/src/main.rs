mod api;
mod config;
mod db;
mod error;
mod models;
mod schema;
mod store;
mod telemetry;
mod types;

use anyhow::Context;
use config::Config;
use std::env;
use std::sync::Arc;

/// Application state shared across all handlers
pub type AppState = Arc<db::DbPool>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --openapi prints the API document and exits
    if env::args().any(|arg| arg == "--openapi") {
        let doc = api::openapi().to_pretty_json()?;
        println!("{}", doc);
        return Ok(());
    }

    telemetry::init();

    let config = Config::load()?;
    let pool: AppState = Arc::new(db::create_pool(&config)?);
    tracing::info!(
        max_size = config.pool_max_size,
        timeout_secs = config.connection_timeout.as_secs(),
        "database pool ready"
    );

    let app = api::app(pool);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI document available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
