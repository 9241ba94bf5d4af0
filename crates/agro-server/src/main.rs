//! Agro Server - Main entry point

use agro_common::logging::{init_logging, LogConfig};
use anyhow::Result;
use tracing::info;

use agro_server::{
    api,
    config::{Config, StoreBackend},
    db,
    store::Stores,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // LOG_* environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("agro-server")
        .filter_directives("agro_server=debug,tower_http=debug,sqlx=info")
        .build()
        .with_env()?;

    let _log_guard = init_logging(&log_config)?;

    info!("Starting Agro Server");

    let config = Config::load()?;
    info!(
        store = %config.store,
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let stores = match config.store {
        StoreBackend::Postgres => {
            let pool = db::create_pool(&config.database).await?;
            db::run_migrations(&pool).await?;
            Stores::postgres(pool)
        },
        StoreBackend::Memory => {
            info!("Using the in-memory store; data is lost on shutdown");
            Stores::in_memory()
        },
    };

    api::serve(config, stores).await
}
