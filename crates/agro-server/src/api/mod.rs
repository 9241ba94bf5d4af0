//! HTTP server assembly
//!
//! Builds the router (service info, health, `/v1` features) with the
//! middleware stack, and serves it with graceful shutdown.

pub mod response;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{future::Future, future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{signal, sync::Notify};
use tower_http::compression::CompressionLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::features;
use crate::middleware;
use crate::store::Stores;

/// Serve the API until Ctrl+C or SIGTERM
pub async fn serve(config: Config, stores: Stores) -> anyhow::Result<()> {
    let app = create_router(stores, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let shutdown_started = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown_started = shutdown_started.clone();
            async move {
                shutdown_signal().await;
                shutdown_started.notify_one();
            }
        })
        .into_future();

    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    drain_within(server, shutdown_started.notified(), drain_timeout).await?;

    Ok(())
}

/// Run `server` to completion, giving it at most `timeout` to drain open
/// connections once `shutdown_started` resolves.
async fn drain_within<S, N>(server: S, shutdown_started: N, timeout: Duration) -> std::io::Result<()>
where
    S: Future<Output = std::io::Result<()>>,
    N: Future<Output = ()>,
{
    let deadline = async {
        shutdown_started.await;
        info!("Waiting up to {} seconds for connections to close", timeout.as_secs());
        tokio::time::sleep(timeout).await;
    };

    tokio::select! {
        result = server => {
            result?;
            info!("Server shut down gracefully");
        },
        _ = deadline => {
            warn!("Connections still open after {} seconds, shutting down", timeout.as_secs());
        },
    }

    Ok(())
}

/// Create the application router with all routes and middleware
pub fn create_router(stores: Stores, config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(stores.clone())
        .nest("/v1", features::router(stores))
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Agro Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check handler
async fn health_check(State(stores): State<Stores>) -> Response {
    let backend = stores.health.backend();

    match stores.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "store": backend })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(store = backend, error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "store": backend })),
            )
                .into_response()
        },
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
