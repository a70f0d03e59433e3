//src/main.rs

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod router;
mod services;

use crate::{
    config::{AppState, Config},
    services::auth::AuthService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(config.clone()).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("database migrations applied");

    spawn_session_sweeper(
        app_state.auth_service.clone(),
        Duration::from_secs(config.session_sweep_interval_secs.max(1)),
    );

    let app = router::build_router(app_state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!("listening on {}", address);

    axum::serve(listener, app).await?;
    Ok(())
}

// Periodically drops sessions past their expiry
fn spawn_session_sweeper(auth_service: AuthService, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(e) = auth_service.cleanup_expired_sessions().await {
                tracing::warn!("session sweep failed: {}", e);
            }
        }
    });
}
