// src/config.rs

use std::{env, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::{
    db::{LocationRepository, ProductRepository, SessionRepository, TransactionRepository, UserRepository},
    services::{
        auth::AuthService, inventory_service::InventoryService, location_service::LocationService,
        product_service::ProductService,
    },
};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub session_ttl_hours: i64,
    pub session_sweep_interval_secs: u64,
    pub bcrypt_cost: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            database_url,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "APP_PORT", 8080)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            session_ttl_hours: parse_or(&lookup, "SESSION_TTL_HOURS", 24)?,
            session_sweep_interval_secs: parse_or(&lookup, "SESSION_SWEEP_INTERVAL_SECS", 3600)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| split_list(&raw))
                .unwrap_or_default(),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Comma-separated, blanks dropped
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub location_service: LocationService,
    pub inventory_service: InventoryService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(connect_options(&config)?)
            .await
            .context("failed to connect to the database")?;

        tracing::info!("database connection established");

        Ok(Self::from_pool(db_pool, config))
    }

    /// Wires repositories and services over an existing pool.
    pub fn from_pool(db_pool: PgPool, config: Config) -> Self {
        let product_repo = ProductRepository::new();
        let location_repo = LocationRepository::new();

        let auth_service = AuthService::new(
            UserRepository::new(),
            SessionRepository::new(),
            chrono::Duration::hours(config.session_ttl_hours),
            config.bcrypt_cost,
            db_pool.clone(),
        );
        let product_service = ProductService::new(product_repo.clone(), location_repo.clone(), db_pool.clone());
        let location_service = LocationService::new(location_repo.clone(), db_pool.clone());
        let inventory_service = InventoryService::new(
            product_repo,
            location_repo,
            TransactionRepository::new(),
            db_pool.clone(),
        );

        Self {
            db_pool,
            config,
            auth_service,
            product_service,
            location_service,
            inventory_service,
        }
    }
}

/// Every pooled connection runs with `timezone=UTC`.
pub fn connect_options(config: &Config) -> anyhow::Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(&config.database_url)
        .context("DATABASE_URL is not a valid Postgres URL")?
        .options([("timezone", "UTC")]);
    Ok(options)
}
