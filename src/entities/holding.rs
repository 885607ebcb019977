//! Holding entity - A user's share position in one company.
//!
//! Keyed by (`user_id`, `company_id`). A position driven to zero shares is
//! deleted rather than stored as a zero row, so every persisted holding is an
//! active position.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Holding database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "holdings")]
pub struct Model {
    /// Platform user ID holding the shares
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Company the shares belong to
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: i64,
    /// Number of shares held, always positive
    pub shares: i64,
}

/// Defines relationships between Holding and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each holding belongs to one company
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id"
    )]
    Company,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
