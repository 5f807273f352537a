use std::net::SocketAddr;

use anyhow::Context;
use portfolio_api::{app, config, is_production, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SECRET_KEY, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    portfolio_api::init_tracing();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Portfolio API in {:?} mode", config.environment);

    if config.security.secret_key.is_empty() {
        tracing::warn!("SECRET_KEY is not set; token issuance and verification will fail");
    }
    if is_production!() && !config.security.whitelisted_ips.is_empty() {
        tracing::warn!(
            "{} whitelisted address(es) bypass token authentication in production",
            config.security.whitelisted_ips.len()
        );
    }

    let app = app(AppState::new(config.clone()));

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Portfolio API listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server error")?;

    Ok(())
}
