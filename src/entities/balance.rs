//! Balance entity - A user's cash balance in the community currency.
//!
//! One row per user, created lazily on first credit and never implicitly
//! deleted. Balances are kept non-negative by the account layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Balance database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "balances")]
pub struct Model {
    /// Platform user ID this balance belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Current cash balance, rounded to cents
    pub balance: f64,
}

/// Balance has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
