//! Shared test utilities for `MarketBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    auth::{Actor, RoleSet},
    core::company,
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test company with a default price of 100.0.
pub async fn create_test_company(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::company::Model> {
    company::create_company(db, name.to_string(), 100.0).await
}

/// Creates a test company with a custom starting price.
pub async fn create_custom_company(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::company::Model> {
    company::create_company(db, name.to_string(), price).await
}

/// The role set privileged operations require in tests.
pub fn admin_roles() -> RoleSet {
    std::iter::once("High Command".to_string()).collect()
}

/// An actor holding the test admin role.
pub fn admin_actor() -> Actor {
    Actor::new("admin_user", ["High Command"])
}

/// An actor holding only an unprivileged role.
pub fn member_actor() -> Actor {
    Actor::new("member_user", ["Member"])
}
