use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use clientdesk::config::AppConfig;
use clientdesk::db;
use clientdesk::web::server::{GatewayState, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clientdesk=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;

    let store = db::connect(&config)
        .await
        .context("connecting to the database")?;
    tracing::info!("database connected, schema up to date");

    let state = Arc::new(GatewayState::new(store));
    let bound = start_server(config.bind_addr(), state.clone())
        .await
        .context("starting web server")?;
    tracing::info!("client info gateway listening on http://{bound}");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    if let Some(tx) = state.shutdown_tx.write().await.take() {
        let _ = tx.send(());
    }

    Ok(())
}
