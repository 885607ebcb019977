//! Periodic market-tick scheduling.
//!
//! Wraps the background task that drives [`crate::core::market::run_market_tick`]
//! on a fixed interval. The task is decoupled from any host runtime concern:
//! the owner calls [`MarketScheduler::start`] once the host signals readiness
//! (the first tick fires immediately) and [`MarketScheduler::shutdown`] when
//! the process stops. Tick failures are logged and never kill the task.

use crate::config::market::MarketConfig;
use crate::core::market;
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Handle to the running market-tick task.
#[derive(Debug)]
pub struct MarketScheduler {
    handle: JoinHandle<()>,
}

impl MarketScheduler {
    /// Spawns the periodic tick task.
    ///
    /// Call this only once the host system is ready to serve; the first tick
    /// runs immediately and then every `tick_interval_secs`.
    #[must_use]
    pub fn start(db: DatabaseConnection, config: MarketConfig) -> Self {
        let interval = Duration::from_secs(config.tick_interval_secs);
        info!(interval_secs = config.tick_interval_secs, "market scheduler started");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match market::run_market_tick(&db, &config).await {
                    Ok(result) => {
                        debug!(
                            updated = result.updated.len(),
                            failed = result.failed,
                            "market tick complete"
                        );
                    }
                    Err(error) => {
                        error!(%error, "market tick failed");
                    }
                }
            }
        });

        Self { handle }
    }

    /// Whether the tick task is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancels the tick task and waits for it to wind down.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
        info!("market scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::database::create_tables;
    use crate::core::company::create_company;
    use crate::entities::PriceHistory;
    use crate::errors::Result;
    use sea_orm::prelude::*;

    // The scheduler task and the test body run concurrently, so this test
    // uses a file-backed database both sides can share through the pool.
    #[tokio::test]
    async fn test_scheduler_ticks_immediately_and_shuts_down() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("market.sqlite").display()
        );
        let db = sea_orm::Database::connect(&url).await?;
        create_tables(&db).await?;
        create_company(&db, "Acme".to_string(), 100.0).await?;

        let config = MarketConfig {
            tick_interval_secs: 3600,
            ..MarketConfig::default()
        };
        let scheduler = MarketScheduler::start(db.clone(), config);
        assert!(scheduler.is_running());

        // The first tick fires immediately; poll briefly for its sample
        let mut samples = Vec::new();
        for _ in 0..50 {
            samples = PriceHistory::find().all(&db).await?;
            if !samples.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(samples.len(), 1);

        scheduler.shutdown().await;

        Ok(())
    }
}
