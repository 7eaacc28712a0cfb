use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;
use inkpost::{config::AppConfig, init_db, make_router, run_app, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("inkpost=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let pool = init_db(&config.database).await?;
    let state = Arc::new(AppState::new(pool, &config));

    let address = config.bind_address();
    let listener =
        TcpListener::bind(&address).with_context(|| format!("Failed to bind {}", address))?;
    run_app(make_router(), listener, state).await
}
