//! Company entity - Represents a listed fictional company.
//!
//! Each company has a unique, case-sensitive name and a current share price.
//! Prices are mutated by the market simulator on every tick or by an admin
//! override, and never drop below the configured floor.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Company database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    /// Unique identifier for the company
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ticker-style display name (e.g., "Halberd_Arms"), unique across the market
    #[sea_orm(unique)]
    pub name: String,
    /// Current share price in the community currency
    pub price: f64,
}

/// Defines relationships between Company and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One company has many holdings
    #[sea_orm(has_many = "super::holding::Entity")]
    Holdings,
    /// One company has many price history samples
    #[sea_orm(has_many = "super::price_history::Entity")]
    PriceHistory,
}

impl Related<super::holding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Holdings.def()
    }
}

impl Related<super::price_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
