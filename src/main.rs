//! `MarketBuddy` daemon - connects the ledger, starts the market simulator,
//! and runs until interrupted. The chat dispatcher is hosted separately and
//! talks to the same ledger through [`market_buddy::context::AppContext`].

use market_buddy::config;
use market_buddy::context::AppContext;
use market_buddy::errors::Result;

use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the market configuration
    let market_config = config::market::load_default_config()
        .inspect_err(|e| error!("Failed to load market configuration: {e}"))?;
    info!("Market configuration loaded.");

    // 4. Initialize the ledger store
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ensured."))
        .inspect_err(|e| error!("Failed to create database tables: {e}"))?;

    // 5. Build the application context and start the simulator
    let mut ctx = AppContext::new(db, market_config);
    ctx.start_market();

    // 6. Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping market scheduler.");
    ctx.shutdown().await;

    Ok(())
}
