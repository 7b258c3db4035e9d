//! Server configuration: command-line arguments with `.env` fallbacks

use crate::error::{Result, RosterError};
use crate::schema::RosterSchema;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "roster-status-server")]
#[command(about = "Player roster and availability API")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// PostgreSQL connection string (or set DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    #[arg(long, default_value_t = 10)]
    pub max_connections: u32,

    #[arg(long, default_value_t = 30)]
    pub acquire_timeout_secs: u64,

    /// JSON file overriding relation and column names
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Serve built-in sample data from memory instead of PostgreSQL
    #[arg(long)]
    pub demo: bool,
}

/// Pool sizing handed to `db::init_pool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self { max_connections: 10, acquire_timeout_secs: 30 }
    }
}

impl ServerConfig {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout_secs: self.acquire_timeout_secs,
        }
    }

    /// The `--database-url` argument, else `DATABASE_URL` from the environment.
    pub fn database_url(&self) -> Result<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .ok_or_else(|| {
                RosterError::Config(
                    "DATABASE_URL not set; pass --database-url or use --demo".to_string(),
                )
            })
    }

    pub fn roster_schema(&self) -> Result<RosterSchema> {
        match &self.schema {
            Some(path) => RosterSchema::load(path),
            None => Ok(RosterSchema::default()),
        }
    }
}
