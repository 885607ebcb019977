//! Database configuration module for `MarketBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{Balance, Company, Holding, PriceHistory};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/market_buddy.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// This function handles connection errors and provides a clean interface for database access
/// throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct
/// definitions. It creates tables for companies, balances, holdings, and price history,
/// and is safe to call on every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut company_table = schema.create_table_from_entity(Company);
    let mut balance_table = schema.create_table_from_entity(Balance);
    let mut holding_table = schema.create_table_from_entity(Holding);
    let mut price_history_table = schema.create_table_from_entity(PriceHistory);

    db.execute(builder.build(company_table.if_not_exists()))
        .await?;
    db.execute(builder.build(balance_table.if_not_exists()))
        .await?;
    db.execute(builder.build(holding_table.if_not_exists()))
        .await?;
    db.execute(builder.build(price_history_table.if_not_exists()))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        balance::Model as BalanceModel, company::Model as CompanyModel,
        holding::Model as HoldingModel, price_history::Model as PriceHistoryModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<CompanyModel> = Company::find().limit(1).all(&db).await?;
        let _: Vec<BalanceModel> = Balance::find().limit(1).all(&db).await?;
        let _: Vec<HoldingModel> = Holding::find().limit(1).all(&db).await?;
        let _: Vec<PriceHistoryModel> = PriceHistory::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;

        let _: Vec<CompanyModel> = Company::find().limit(1).all(&db).await?;
        Ok(())
    }
}
