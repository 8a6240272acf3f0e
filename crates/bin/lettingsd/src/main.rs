//! Lettings daemon — wires the storage adapter into the application
//! services and serves the HTTP API.

use lettings_adapter_http_axum::router;
use lettings_adapter_http_axum::state::AppState;
use lettings_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteAgentRepository, SqliteCategoryRepository,
    SqliteHouseRepository, SqliteUserDirectory,
};
use lettings_app::services::{AgentService, HouseService};

mod config;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    tracing::info!(
        database_url = config.database_url(),
        strict_renting = config.renting.strict,
        "starting lettings server"
    );

    let database = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;

    let house_service = HouseService::new(
        SqliteHouseRepository::new(database.pool().clone()),
        SqliteCategoryRepository::new(database.pool().clone()),
    )
    .with_strict_renting(config.renting.strict);
    let agent_service = AgentService::new(SqliteAgentRepository::new(database.pool().clone()));
    let users = SqliteUserDirectory::new(database.pool().clone());

    let app = router::build(AppState::new(house_service, agent_service, users));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "unable to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}
