//! Partner entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner model - an organisation that issues promo codes under a limit
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    /// Partner UUID (hyphenated string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Inactive partners reject limit changes
    pub is_active: bool,

    /// Promo codes issued under the current active limit
    pub number_issued_promo_codes: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::partner_promo_code_limit::Entity")]
    Limits,
}

impl Related<super::partner_promo_code_limit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Limits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
