//! Market simulation business logic - the periodic price tick.
//!
//! Each tick walks every listed company, perturbs its price with bounded
//! random jitter plus a small zero-centered drift, clamps the result to the
//! price floor, and appends a history sample. Companies are processed
//! independently: a failure updating one is logged and counted, and the tick
//! carries on with the rest.

use crate::{
    config::market::MarketConfig,
    core::{company, round_cents},
    entities::{Company, company as company_entity, price_history},
    errors::Result,
};
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use tracing::{debug, warn};

/// One company's price move within a tick.
#[derive(Debug, Clone)]
pub struct CompanyTickUpdate {
    /// Company that moved
    pub company_name: String,
    /// Price before the tick
    pub old_price: f64,
    /// Price after the tick
    pub new_price: f64,
}

/// Summary of one full market tick.
#[derive(Debug, Clone)]
pub struct MarketTickResult {
    /// Per-company moves that settled
    pub updated: Vec<CompanyTickUpdate>,
    /// Companies whose update failed and was skipped
    pub failed: usize,
}

/// Draws the next price for a company.
///
/// A non-positive stored price is treated as the floor before perturbation.
/// The result is `max(floor, round(p * (1 + jitter + drift), 2))` with
/// `jitter ~ U(-J, J)` and `drift = D * (U(0,1) - 0.5)`.
pub fn next_price<R: Rng>(config: &MarketConfig, current: f64, rng: &mut R) -> f64 {
    let price = if current <= 0.0 {
        config.price_floor
    } else {
        current
    };
    let jitter = rng.gen_range(-config.max_jitter_pct..=config.max_jitter_pct);
    let drift = config.drift_pct * (rng.gen_range(0.0..1.0) - 0.5);
    round_cents(price * (1.0 + jitter + drift)).max(config.price_floor)
}

/// Writes one company's new price and appends its history sample.
async fn tick_company(
    db: &DatabaseConnection,
    config: &MarketConfig,
    company: &company_entity::Model,
) -> Result<CompanyTickUpdate> {
    let new_price = {
        let mut rng = rand::thread_rng();
        next_price(config, company.price, &mut rng)
    };

    let txn = db.begin().await?;
    Company::update_many()
        .col_expr(company_entity::Column::Price, Expr::value(new_price))
        .filter(company_entity::Column::Id.eq(company.id))
        .exec(&txn)
        .await?;
    let sample = price_history::ActiveModel {
        company_id: Set(company.id),
        ts: Set(chrono::Utc::now()),
        price: Set(new_price),
        ..Default::default()
    };
    sample.insert(&txn).await?;
    txn.commit().await?;

    Ok(CompanyTickUpdate {
        company_name: company.name.clone(),
        old_price: company.price,
        new_price,
    })
}

/// Runs one market tick over every listed company.
///
/// Per-company failures are isolated: they are logged at warn level and
/// counted in the result, and the remaining companies still update.
pub async fn run_market_tick(
    db: &DatabaseConnection,
    config: &MarketConfig,
) -> Result<MarketTickResult> {
    let companies = company::get_all_companies(db).await?;
    let mut updated = Vec::with_capacity(companies.len());
    let mut failed = 0;

    for company in &companies {
        match tick_company(db, config, company).await {
            Ok(update) => {
                debug!(
                    company = %update.company_name,
                    old_price = update.old_price,
                    new_price = update.new_price,
                    "price updated"
                );
                updated.push(update);
            }
            Err(error) => {
                failed += 1;
                warn!(
                    company = %company.name,
                    %error,
                    "price update failed, continuing tick"
                );
            }
        }
    }

    Ok(MarketTickResult { updated, failed })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::PriceHistory;
    use crate::test_utils::{create_custom_company, setup_test_db};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_next_price_stays_within_bounds() {
        let config = MarketConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let max_move = config.max_jitter_pct + config.drift_pct / 2.0;

        let mut price = 100.0;
        for _ in 0..1_000 {
            let next = next_price(&config, price, &mut rng);
            assert!(next >= config.price_floor);
            // Rounding to cents adds at most half a cent on a ~100 price
            assert!((next / price - 1.0).abs() <= max_move + 1e-3);
            price = next;
        }
    }

    #[test]
    fn test_next_price_clamps_non_positive_input() {
        let config = MarketConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for bad in [0.0, -12.5] {
            let next = next_price(&config, bad, &mut rng);
            assert!(next >= config.price_floor);
            // Perturbed from the floor, not from the bad value
            assert!(next <= config.price_floor * 1.06);
        }
    }

    #[test]
    fn test_next_price_never_drops_below_floor() {
        let config = MarketConfig::default();
        let mut rng = StdRng::seed_from_u64(99);

        // At the floor itself, every downward move clamps back to the floor
        for _ in 0..200 {
            let next = next_price(&config, config.price_floor, &mut rng);
            assert!(next >= config.price_floor);
        }
    }

    #[tokio::test]
    async fn test_run_market_tick_updates_all_companies() -> Result<()> {
        let db = setup_test_db().await?;
        let config = MarketConfig::default();

        create_custom_company(&db, "Acme", 100.0).await?;
        create_custom_company(&db, "Bravo", 50.0).await?;

        let result = run_market_tick(&db, &config).await?;
        assert_eq!(result.updated.len(), 2);
        assert_eq!(result.failed, 0);

        // Every company carries a fresh, in-bounds price
        let companies = company::get_all_companies(&db).await?;
        let max_move = config.max_jitter_pct + config.drift_pct / 2.0 + 1e-3;
        for (company, update) in companies.iter().zip(&result.updated) {
            assert_eq!(company.name, update.company_name);
            assert_eq!(company.price, update.new_price);
            assert!(company.price >= config.price_floor);
            assert!((update.new_price / update.old_price - 1.0).abs() <= max_move);
        }

        // One history sample per company per tick
        let samples = PriceHistory::find().all(&db).await?;
        assert_eq!(samples.len(), 2);

        run_market_tick(&db, &config).await?;
        let samples = PriceHistory::find().all(&db).await?;
        assert_eq!(samples.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_run_market_tick_empty_market() -> Result<()> {
        let db = setup_test_db().await?;
        let result = run_market_tick(&db, &MarketConfig::default()).await?;
        assert!(result.updated.is_empty());
        assert_eq!(result.failed, 0);
        Ok(())
    }
}
