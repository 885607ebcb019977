//! Report generation business logic.
//!
//! Structured read-only views over the ledger - a user's portfolio with its
//! totals, net worth, and recent price history for a company. All functions
//! return structured data for the dispatcher to format; nothing is cached.

use crate::{
    core::{account, company, round_cents},
    entities::{PriceHistory, price_history},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect, prelude::*};

/// One line of a portfolio report.
#[derive(Debug, Clone)]
pub struct PortfolioLine {
    /// Company name
    pub company_name: String,
    /// Shares held
    pub shares: i64,
    /// Current price per share
    pub price: f64,
    /// Position value, `round(shares * price, 2)`
    pub value: f64,
}

/// A user's portfolio with cash and totals.
#[derive(Debug, Clone)]
pub struct PortfolioReport {
    /// User the report is for
    pub user_id: String,
    /// Cash balance
    pub balance: f64,
    /// Active positions, ordered by company name
    pub positions: Vec<PortfolioLine>,
    /// Sum of position values
    pub portfolio_value: f64,
    /// Cash plus portfolio value
    pub net_worth: f64,
}

/// Builds a user's portfolio report from committed ledger state.
pub async fn generate_portfolio_report(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<PortfolioReport> {
    let balance = account::get_balance(db, user_id).await?;
    let positions: Vec<PortfolioLine> = account::get_portfolio(db, user_id)
        .await?
        .into_iter()
        .map(|position| {
            #[allow(clippy::cast_precision_loss)]
            let value = round_cents(position.price * position.shares as f64);
            PortfolioLine {
                company_name: position.company_name,
                shares: position.shares,
                price: position.price,
                value,
            }
        })
        .collect();

    let portfolio_value = round_cents(positions.iter().map(|line| line.value).sum());
    let net_worth = round_cents(balance + portfolio_value);

    Ok(PortfolioReport {
        user_id: user_id.to_owned(),
        balance,
        positions,
        portfolio_value,
        net_worth,
    })
}

/// A user's net worth: cash plus the current value of every position.
pub async fn net_worth(db: &DatabaseConnection, user_id: &str) -> Result<f64> {
    let report = generate_portfolio_report(db, user_id).await?;
    Ok(report.net_worth)
}

/// Returns a company's most recent price samples, newest first.
///
/// `limit` defaults to 10 when not given.
pub async fn recent_price_history(
    db: &DatabaseConnection,
    company_name: &str,
    limit: Option<u64>,
) -> Result<Vec<price_history::Model>> {
    let company = company::get_company_by_name(db, company_name)
        .await?
        .ok_or_else(|| Error::CompanyNotFound {
            name: company_name.to_owned(),
        })?;

    PriceHistory::find()
        .filter(price_history::Column::CompanyId.eq(company.id))
        .order_by_desc(price_history::Column::Ts)
        .limit(limit.unwrap_or(10))
        .all(db)
        .await
        .map_err(Into::into)
}
