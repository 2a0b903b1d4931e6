use std::sync::Arc;

use color_eyre::{eyre::Context, Result};
use dotenv::dotenv;
use eas_core::{Ledger, MemoryStore};
use eas_primitives::Event;
use eas_server::{
    app_state::AppState, config::Config, routes::router,
    subscription_manager::SubscriptionManager,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    // Load configuration
    let config_path = Config::path_from_env();
    let config = Config::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path))?;
    // tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(config.log_level()?)
        .init();

    let deployment = config.deployment();
    info!(
        chain_id = deployment.chain_id,
        eas = %deployment.eas,
        proxy = %deployment.proxy,
        indexer = %deployment.indexer,
        "starting attestation service"
    );

    let ledger = Ledger::new(&deployment, MemoryStore::new());
    let subscription_manager: Arc<SubscriptionManager<Event>> =
        Arc::new(SubscriptionManager::new(config.subscription_capacity));
    let app_state = AppState::new(ledger, subscription_manager).await;
    let app = router(app_state);

    let server_url = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(server_url).await.context(format!(
        "Failed to bind server to port {}",
        config.server_port
    ))?;

    info!("Server running on port {}", config.server_port);
    axum::serve(listener, app).await?;

    Ok(())
}
