//! HTTP server for the roster API
//!
//! Run with: cargo run --bin server -- --demo

use anyhow::Result;
use clap::Parser;
use roster_status::api::{serve, Router};
use roster_status::config::ServerConfig;
use roster_status::db::{init_pool, PgGateway, StorageGateway};
use roster_status::demo::demo_gateway;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();
    let schema = Arc::new(config.roster_schema()?);

    let gateway: Arc<dyn StorageGateway> = if config.demo {
        warn!("demo mode: serving built-in sample data");
        Arc::new(demo_gateway())
    } else {
        let pool = init_pool(&config.database_url()?, &config.pool_settings()).await?;
        Arc::new(PgGateway::new(pool))
    };

    let router = Arc::new(Router::new(gateway, schema));
    let listener = TcpListener::bind(&config.bind).await?;
    info!(bind = %config.bind, "starting roster API server");

    serve(listener, router).await?;
    Ok(())
}
