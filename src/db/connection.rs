//! Database connection management using sqlx

use crate::config::PoolSettings;
use crate::error::{Result, RosterError};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

pub type DbPool = PgPool;

/// Initialize the database connection pool
pub async fn init_pool(database_url: &str, settings: &PoolSettings) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(database_url)
        .await
        .map_err(|e| RosterError::DataAccess(format!("Failed to connect: {}", e)))?;

    // Test the connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| RosterError::DataAccess(format!("Connection probe failed: {}", e)))?;

    info!(
        max_connections = settings.max_connections,
        "database pool ready"
    );
    Ok(pool)
}
