//! `SeaORM` Entity for the period_stock_carry table.
//!
//! Immutable snapshots of remaining stock taken at period closure;
//! `carried_value` is frozen at insert and never recomputed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "period_stock_carry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub from_period_id: Uuid,
    pub to_period_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub carried_value: Decimal,
    pub carried_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::periods::Entity",
        from = "Column::FromPeriodId",
        to = "super::periods::Column::Id"
    )]
    FromPeriod,
    #[sea_orm(
        belongs_to = "super::periods::Entity",
        from = "Column::ToPeriodId",
        to = "super::periods::Column::Id"
    )]
    ToPeriod,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
