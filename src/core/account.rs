//! Account business logic - cash balances and share holdings.
//!
//! These are the ledger primitives the trading engine composes. Balance rows
//! are created lazily on first credit and never implicitly deleted; a debit is
//! a single guarded UPDATE so no interleaving of callers can drive a balance
//! negative. Holding rows are deleted when a position reaches zero shares, so
//! every persisted row is an active position. All stored monetary values are
//! rounded to cents at the write boundary.
//!
//! Functions are generic over [`ConnectionTrait`] so the trading engine can
//! run them inside one transaction.

use crate::{
    core::round_cents,
    entities::{Balance, Company, Holding, balance, holding},
    errors::{Error, Result},
};
use sea_orm::sea_query::{Expr, Func, OnConflict, SimpleExpr};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// A user's active position in one company, with its current price.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPosition {
    /// Company name
    pub company_name: String,
    /// Shares held, always positive
    pub shares: i64,
    /// Current price per share
    pub price: f64,
}

/// Returns a user's cash balance, 0.0 when no row exists.
///
/// Absence is not an error: a user who has never been credited simply has
/// nothing.
pub async fn get_balance<C>(db: &C, user_id: &str) -> Result<f64>
where
    C: ConnectionTrait,
{
    Ok(Balance::find_by_id(user_id.to_owned())
        .one(db)
        .await?
        .map_or(0.0, |row| row.balance))
}

/// Sets a user's balance to an absolute value, creating the row if needed.
pub async fn set_balance<C>(db: &C, user_id: &str, value: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidAmount { amount: value });
    }

    let row = balance::ActiveModel {
        user_id: Set(user_id.to_owned()),
        balance: Set(round_cents(value)),
    };
    Balance::insert(row)
        .on_conflict(
            OnConflict::column(balance::Column::UserId)
                .update_column(balance::Column::Balance)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Atomically adjusts a user's balance by a delta, returning the new balance.
///
/// A credit upserts the row, creating it lazily for first-time users. A debit
/// is a single conditional UPDATE (`... WHERE balance >= required`) so the
/// floor check and the decrement cannot be separated by a concurrent writer;
/// zero rows affected means the funds were not there and nothing changed.
/// Both paths round the stored sum to cents inside SQL.
pub async fn add_balance<C>(db: &C, user_id: &str, delta: f64) -> Result<f64>
where
    C: ConnectionTrait,
{
    if !delta.is_finite() {
        return Err(Error::InvalidAmount { amount: delta });
    }

    let delta = round_cents(delta);
    let rounded_sum: SimpleExpr =
        Func::round_with_precision(Expr::col(balance::Column::Balance).add(delta), 2).into();

    if delta >= 0.0 {
        let row = balance::ActiveModel {
            user_id: Set(user_id.to_owned()),
            balance: Set(delta),
        };
        Balance::insert(row)
            .on_conflict(
                OnConflict::column(balance::Column::UserId)
                    .value(balance::Column::Balance, rounded_sum)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    } else {
        let required = -delta;
        let result = Balance::update_many()
            .col_expr(balance::Column::Balance, rounded_sum)
            .filter(balance::Column::UserId.eq(user_id))
            .filter(balance::Column::Balance.gte(required))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            let current = get_balance(db, user_id).await?;
            return Err(Error::InsufficientFunds { current, required });
        }
    }

    get_balance(db, user_id).await
}

/// Returns the shares a user holds in a company, 0 when no row exists.
pub async fn get_shares<C>(db: &C, user_id: &str, company_id: i64) -> Result<i64>
where
    C: ConnectionTrait,
{
    Ok(Holding::find_by_id((user_id.to_owned(), company_id))
        .one(db)
        .await?
        .map_or(0, |row| row.shares))
}

/// Sets a user's position in a company to an absolute share count.
///
/// A count of zero or less deletes the row - zero positions are never stored.
pub async fn set_shares<C>(db: &C, user_id: &str, company_id: i64, shares: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    if shares <= 0 {
        Holding::delete_many()
            .filter(holding::Column::UserId.eq(user_id))
            .filter(holding::Column::CompanyId.eq(company_id))
            .exec(db)
            .await?;
    } else {
        let row = holding::ActiveModel {
            user_id: Set(user_id.to_owned()),
            company_id: Set(company_id),
            shares: Set(shares),
        };
        Holding::insert(row)
            .on_conflict(
                OnConflict::columns([holding::Column::UserId, holding::Column::CompanyId])
                    .update_column(holding::Column::Shares)
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    Ok(())
}

/// Returns a user's active positions with current prices, ordered by company
/// name case-insensitively.
pub async fn get_portfolio(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<PortfolioPosition>> {
    let rows = Holding::find()
        .filter(holding::Column::UserId.eq(user_id))
        .filter(holding::Column::Shares.gt(0))
        .find_also_related(Company)
        .all(db)
        .await?;

    let mut positions: Vec<PortfolioPosition> = rows
        .into_iter()
        .filter_map(|(held, company)| {
            company.map(|company| PortfolioPosition {
                company_name: company.name,
                shares: held.shares,
                price: company.price,
            })
        })
        .collect();
    positions.sort_by_key(|position| position.company_name.to_lowercase());

    Ok(positions)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{create_custom_company, create_test_company, setup_test_db};

    #[tokio::test]
    async fn test_get_balance_absent_user_is_zero() -> Result<()> {
        let db = setup_test_db().await?;
        assert_eq!(get_balance(&db, "nobody").await?, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_balance_creates_row_lazily() -> Result<()> {
        let db = setup_test_db().await?;

        let new_balance = add_balance(&db, "trader", 500.0).await?;
        assert_eq!(new_balance, 500.0);
        assert_eq!(get_balance(&db, "trader").await?, 500.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_balance_rounds_stored_sum() -> Result<()> {
        let db = setup_test_db().await?;

        // Three dimes stored as an exact 0.30, not 0.30000000000000004
        add_balance(&db, "trader", 0.1).await?;
        add_balance(&db, "trader", 0.1).await?;
        let new_balance = add_balance(&db, "trader", 0.1).await?;
        assert_eq!(new_balance, 0.3);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_balance_debit_below_zero_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        add_balance(&db, "trader", 100.0).await?;
        let result = add_balance(&db, "trader", -100.01).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientFunds {
                current: 100.0,
                required: 100.01
            }
        ));
        // No partial mutation
        assert_eq!(get_balance(&db, "trader").await?, 100.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_balance_debit_absent_user_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let result = add_balance(&db, "nobody", -5.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientFunds {
                current: 0.0,
                required: 5.0
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_balance_debit_to_exactly_zero() -> Result<()> {
        let db = setup_test_db().await?;

        add_balance(&db, "trader", 75.5).await?;
        let new_balance = add_balance(&db, "trader", -75.5).await?;
        assert_eq!(new_balance, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_balance_non_finite_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let result = add_balance(&db, "trader", f64::NAN).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_balance() -> Result<()> {
        let db = setup_test_db().await?;

        set_balance(&db, "trader", 42.424).await?;
        assert_eq!(get_balance(&db, "trader").await?, 42.42);

        set_balance(&db, "trader", 10.0).await?;
        assert_eq!(get_balance(&db, "trader").await?, 10.0);

        let result = set_balance(&db, "trader", -1.0).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_shares_absent_is_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let company = create_test_company(&db, "Acme").await?;
        assert_eq!(get_shares(&db, "nobody", company.id).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_shares_upserts_and_deletes_at_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let company = create_test_company(&db, "Acme").await?;

        set_shares(&db, "trader", company.id, 3).await?;
        assert_eq!(get_shares(&db, "trader", company.id).await?, 3);

        set_shares(&db, "trader", company.id, 10).await?;
        assert_eq!(get_shares(&db, "trader", company.id).await?, 10);

        // Zero removes the row entirely
        set_shares(&db, "trader", company.id, 0).await?;
        assert_eq!(get_shares(&db, "trader", company.id).await?, 0);
        let rows = Holding::find().all(&db).await?;
        assert!(rows.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_portfolio_only_active_positions_ordered() -> Result<()> {
        let db = setup_test_db().await?;

        let zenith = create_custom_company(&db, "zenith", 12.5).await?;
        let acme = create_custom_company(&db, "Acme", 100.0).await?;
        let bravo = create_custom_company(&db, "Bravo", 50.0).await?;

        set_shares(&db, "trader", zenith.id, 4).await?;
        set_shares(&db, "trader", acme.id, 2).await?;
        // A position opened and fully closed must not appear
        set_shares(&db, "trader", bravo.id, 1).await?;
        set_shares(&db, "trader", bravo.id, 0).await?;
        // Another user's position must not leak in
        set_shares(&db, "other", bravo.id, 9).await?;

        let portfolio = get_portfolio(&db, "trader").await?;
        assert_eq!(
            portfolio,
            vec![
                PortfolioPosition {
                    company_name: "Acme".to_string(),
                    shares: 2,
                    price: 100.0,
                },
                PortfolioPosition {
                    company_name: "zenith".to_string(),
                    shares: 4,
                    price: 12.5,
                },
            ]
        );

        Ok(())
    }
}
