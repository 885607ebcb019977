//! Application context - the shared state built once at startup.
//!
//! Holds the ledger connection, the market configuration, the trading
//! engine, and (once started) the scheduler handle. Constructed in `main`
//! and passed to whatever hosts the command dispatcher; nothing in the crate
//! reaches for global state.

use crate::config::market::MarketConfig;
use crate::core::trading::TradingEngine;
use crate::scheduler::MarketScheduler;
use sea_orm::DatabaseConnection;

/// Shared application state.
#[derive(Debug)]
pub struct AppContext {
    /// Ledger store connection
    pub db: DatabaseConnection,
    /// Market simulator and privileged-role configuration
    pub market: MarketConfig,
    /// Trading engine over the ledger
    pub trading: TradingEngine,
    scheduler: Option<MarketScheduler>,
}

impl AppContext {
    /// Builds the context from a connected ledger and loaded configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, market: MarketConfig) -> Self {
        let trading = TradingEngine::new(db.clone());
        Self {
            db,
            market,
            trading,
            scheduler: None,
        }
    }

    /// Starts the market scheduler; call once the host signals readiness.
    ///
    /// A second call is a no-op while the first scheduler is still running.
    pub fn start_market(&mut self) {
        let running = self
            .scheduler
            .as_ref()
            .is_some_and(MarketScheduler::is_running);
        if !running {
            self.scheduler = Some(MarketScheduler::start(
                self.db.clone(),
                self.market.clone(),
            ));
        }
    }

    /// Stops the market scheduler, if it was started.
    pub async fn shutdown(self) {
        if let Some(scheduler) = self.scheduler {
            scheduler.shutdown().await;
        }
    }
}
