use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use roster_status::db::{init_pool, PgGateway, StorageGateway};
use roster_status::demo::demo_gateway;
use roster_status::{PlayerId, RosterSchema, StatusPipeline};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "roster-status")]
#[command(about = "Resolve one player's season batting record and game-day status")]
struct Args {
    /// Player reference (PlayerRefID)
    player: String,

    /// Game day to classify against (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// PostgreSQL connection string (or set DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// JSON file overriding relation and column names
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Use the built-in sample data
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let schema = match &args.schema {
        Some(path) => RosterSchema::load(path)?,
        None => RosterSchema::default(),
    };

    let gateway: Arc<dyn StorageGateway> = if args.demo {
        Arc::new(demo_gateway())
    } else {
        let url = args
            .database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL not set; pass --database-url or --demo"))?;
        let pool = init_pool(&url, &Default::default()).await?;
        Arc::new(PgGateway::new(pool))
    };

    let pipeline = StatusPipeline::new(gateway, Arc::new(schema));
    let player = PlayerId::new(&args.player)?;
    info!(player = %player, "resolving player status");

    let status = match args.date {
        Some(day) => pipeline.player_status_on(&player, day).await?,
        None => pipeline.player_status(&player).await?,
    };

    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
