//! Common test utilities for agro server integration tests
//!
//! - Router over the in-memory store, driven with `tower::ServiceExt::oneshot`
//! - PostgreSQL container with migrations applied (requires Docker)
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{send, test_app};
//!
//! #[tokio::test]
//! async fn test_health() {
//!     let app = test_app();
//!     let (status, body) = send(&app, "GET", "/health", None).await;
//!     assert_eq!(body["status"], "healthy");
//! }
//! ```

#![allow(dead_code)]

use agro_server::{api, config::Config, db, store::Stores};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use testcontainers::{core::IntoContainerPort, runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tower::ServiceExt;

// ============================================================================
// HTTP helpers
// ============================================================================

/// Full application router over a fresh in-memory store
pub fn test_app() -> Router {
    app_with(Stores::in_memory())
}

pub fn app_with(stores: Stores) -> Router {
    api::create_router(stores, &Config::default())
}

/// Send a request and decode the JSON response body (`Null` when empty)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json");

    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    send_request(app, request).await
}

/// Send a raw body, for malformed JSON cases
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

// ============================================================================
// PostgreSQL Test Container
// ============================================================================

/// PostgreSQL container with the schema applied
pub struct TestPostgres {
    _container: ContainerAsync<Postgres>,
    pool: PgPool,
}

impl TestPostgres {
    pub async fn start() -> Result<Self> {
        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container
            .get_host()
            .await
            .context("Failed to get container host")?;
        let port = container
            .get_host_port_ipv4(5432.tcp())
            .await
            .context("Failed to get container port")?;

        let connection_string =
            format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&connection_string)
            .await
            .context("Failed to connect to PostgreSQL")?;

        db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            _container: container,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn stores(&self) -> Stores {
        Stores::postgres(self.pool.clone())
    }
}
