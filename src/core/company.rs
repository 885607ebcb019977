//! Company business logic - listing, delisting, and price management.
//!
//! Provides functions for creating, retrieving, updating, and removing
//! companies. Company names are unique and matched case-sensitively; listings
//! are returned in case-insensitive name order. Removing a company cascades
//! to its holdings so no position can reference a delisted company. All
//! functions are async and return Result types for error handling.

use crate::{
    config::market::MIN_PRICE,
    core::round_cents,
    entities::{Company, Holding, company, holding},
    errors::{Error, Result},
};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{DatabaseConnection, Order, QueryOrder, Set, TransactionTrait, prelude::*};

/// Retrieves all listed companies, ordered by name case-insensitively.
///
/// This is the market overview the dispatcher renders, and the sweep the
/// market simulator ticks over.
pub async fn get_all_companies(db: &DatabaseConnection) -> Result<Vec<company::Model>> {
    let name_ci: SimpleExpr = Func::lower(Expr::col(company::Column::Name)).into();
    Company::find()
        .order_by(name_ci, Order::Asc)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a company by its exact, case-sensitive name.
pub async fn get_company_by_name<C>(db: &C, name: &str) -> Result<Option<company::Model>>
where
    C: ConnectionTrait,
{
    Company::find()
        .filter(company::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a new company at the given starting price.
///
/// The name must be non-empty and unused; the price must be finite and
/// positive. The stored price is rounded to cents and clamped to the floor,
/// the same normalization every later price write applies.
pub async fn create_company(
    db: &DatabaseConnection,
    name: String,
    price: f64,
) -> Result<company::Model> {
    // Validate inputs
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Company name cannot be empty".to_string(),
        });
    }

    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }

    let name = name.trim().to_string();
    if get_company_by_name(db, &name).await?.is_some() {
        return Err(Error::DuplicateName { name });
    }

    let company = company::ActiveModel {
        name: Set(name),
        price: Set(round_cents(price).max(MIN_PRICE)),
        ..Default::default()
    };

    company.insert(db).await.map_err(Into::into)
}

/// Delists a company and clears every holding in it.
///
/// Returns false when no such company exists, so repeated removal is
/// harmless. Price history is retained for the delisted id.
pub async fn remove_company(db: &DatabaseConnection, name: &str) -> Result<bool> {
    let txn = db.begin().await?;

    let Some(company) = get_company_by_name(&txn, name).await? else {
        return Ok(false);
    };

    Holding::delete_many()
        .filter(holding::Column::CompanyId.eq(company.id))
        .exec(&txn)
        .await?;
    company.delete(&txn).await?;

    txn.commit().await?;
    Ok(true)
}

/// Overrides a company's price, returning false when the company is unknown.
///
/// The price is validated, rounded to cents, and clamped to the floor.
pub async fn set_price(db: &DatabaseConnection, name: &str, price: f64) -> Result<bool> {
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }

    let result = Company::update_many()
        .col_expr(
            company::Column::Price,
            Expr::value(round_cents(price).max(MIN_PRICE)),
        )
        .filter(company::Column::Name.eq(name))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}
