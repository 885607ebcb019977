//! Trading business logic - buy, sell, and privileged balance adjustments.
//!
//! Every trade moves through validation, settlement, or rejection: arguments
//! are checked first, then the company and the user's funds or position, and
//! only a fully validated trade mutates the ledger. A rejected trade leaves
//! no partial state behind.
//!
//! A trade composes two dependent writes (debit balance + credit shares, or
//! the reverse), so the engine serializes all mutations for a given user: an
//! async per-user lock is held across the whole operation and the writes run
//! inside one database transaction. A concurrent trade for the same user
//! therefore settles against the committed balance, never a stale read.

use crate::{
    auth::{Actor, RoleSet},
    core::{account, company, round_cents},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Which side of the book a trade was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    /// Shares bought, cash debited
    Buy,
    /// Shares sold, cash credited
    Sell,
}

/// The settled outcome of a trade, for the dispatcher to format.
#[derive(Debug, Clone)]
pub struct TradeReceipt {
    /// Buy or sell
    pub side: TradeSide,
    /// Company traded
    pub company_name: String,
    /// Shares moved
    pub shares: i64,
    /// Price per share the trade settled at
    pub price_per_share: f64,
    /// Total cost (buy) or proceeds (sell), rounded to cents
    pub amount: f64,
    /// The user's cash balance after settlement
    pub balance_after: f64,
}

/// Hands out one async mutex per user id.
///
/// The map only ever grows; entries are a pointer each and the user
/// population of a single community is small.
#[derive(Debug, Default)]
struct UserLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
    fn lock_for(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(map.entry(user_id.to_owned()).or_default())
    }
}

/// Executes trades and privileged balance operations against the ledger.
#[derive(Debug)]
pub struct TradingEngine {
    db: DatabaseConnection,
    locks: UserLocks,
}

impl TradingEngine {
    /// Creates an engine over the given ledger connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            locks: UserLocks::default(),
        }
    }

    /// Buys shares of a company for a user at the current price.
    ///
    /// Rejects non-positive share counts (`InvalidQuantity`), unknown
    /// companies (`CompanyNotFound`), and underfunded users
    /// (`InsufficientFunds`), all without mutating the ledger. The cost is
    /// `round(price * shares, 2)`.
    pub async fn buy(&self, user_id: &str, company_name: &str, shares: i64) -> Result<TradeReceipt> {
        if shares <= 0 {
            return Err(Error::InvalidQuantity { quantity: shares });
        }

        let user_lock = self.locks.lock_for(user_id);
        let _guard = user_lock.lock().await;

        let txn = self.db.begin().await?;

        let company = company::get_company_by_name(&txn, company_name)
            .await?
            .ok_or_else(|| Error::CompanyNotFound {
                name: company_name.to_owned(),
            })?;

        #[allow(clippy::cast_precision_loss)]
        let cost = round_cents(company.price * shares as f64);
        let balance_after = account::add_balance(&txn, user_id, -cost).await?;

        let owned = account::get_shares(&txn, user_id, company.id).await?;
        account::set_shares(&txn, user_id, company.id, owned + shares).await?;

        txn.commit().await?;

        info!(
            user_id,
            company = %company.name,
            shares,
            cost,
            "buy settled"
        );
        Ok(TradeReceipt {
            side: TradeSide::Buy,
            company_name: company.name,
            shares,
            price_per_share: company.price,
            amount: cost,
            balance_after,
        })
    }

    /// Sells shares of a company for a user at the current price.
    ///
    /// Rejects non-positive share counts (`InvalidQuantity`), unknown
    /// companies (`CompanyNotFound`), and oversized sells
    /// (`InsufficientShares`), all without mutating the ledger. A sell that
    /// exhausts the position removes the holding row.
    pub async fn sell(
        &self,
        user_id: &str,
        company_name: &str,
        shares: i64,
    ) -> Result<TradeReceipt> {
        if shares <= 0 {
            return Err(Error::InvalidQuantity { quantity: shares });
        }

        let user_lock = self.locks.lock_for(user_id);
        let _guard = user_lock.lock().await;

        let txn = self.db.begin().await?;

        let company = company::get_company_by_name(&txn, company_name)
            .await?
            .ok_or_else(|| Error::CompanyNotFound {
                name: company_name.to_owned(),
            })?;

        let owned = account::get_shares(&txn, user_id, company.id).await?;
        if owned < shares {
            return Err(Error::InsufficientShares {
                owned,
                requested: shares,
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let proceeds = round_cents(company.price * shares as f64);
        account::set_shares(&txn, user_id, company.id, owned - shares).await?;
        let balance_after = account::add_balance(&txn, user_id, proceeds).await?;

        txn.commit().await?;

        info!(
            user_id,
            company = %company.name,
            shares,
            proceeds,
            "sell settled"
        );
        Ok(TradeReceipt {
            side: TradeSide::Sell,
            company_name: company.name,
            shares,
            price_per_share: company.price,
            amount: proceeds,
            balance_after,
        })
    }

    /// Credits a user's balance (privileged), returning the new balance.
    ///
    /// The actor must hold one of the required roles; the amount must be a
    /// finite, positive value.
    pub async fn fund(
        &self,
        actor: &Actor,
        required_roles: &RoleSet,
        user_id: &str,
        amount: f64,
    ) -> Result<f64> {
        Self::check_privileged(actor, required_roles)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { amount });
        }

        let user_lock = self.locks.lock_for(user_id);
        let _guard = user_lock.lock().await;

        let new_balance = account::add_balance(&self.db, user_id, round_cents(amount)).await?;
        info!(user_id, amount, new_balance, actor = %actor.user_id, "balance funded");
        Ok(new_balance)
    }

    /// Debits a user's balance (privileged), returning the new balance.
    ///
    /// Rejects with `InsufficientFunds` when the debit would drive the
    /// balance negative.
    pub async fn defund(
        &self,
        actor: &Actor,
        required_roles: &RoleSet,
        user_id: &str,
        amount: f64,
    ) -> Result<f64> {
        Self::check_privileged(actor, required_roles)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { amount });
        }

        let user_lock = self.locks.lock_for(user_id);
        let _guard = user_lock.lock().await;

        let new_balance = account::add_balance(&self.db, user_id, -round_cents(amount)).await?;
        info!(user_id, amount, new_balance, actor = %actor.user_id, "balance defunded");
        Ok(new_balance)
    }

    fn check_privileged(actor: &Actor, required_roles: &RoleSet) -> Result<()> {
        if actor.is_authorized(required_roles) {
            Ok(())
        } else {
            let mut required: Vec<String> = required_roles.iter().cloned().collect();
            required.sort();
            Err(Error::Unauthorized { required })
        }
    }
}
