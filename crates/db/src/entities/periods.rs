//! `SeaORM` Entity for the periods table.
//!
//! At most one period is active system-wide; chronological order is
//! `(year, month)` order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub year: i32,
    pub month: i32,
    pub label: String,
    pub start_date: Date,
    pub end_date: Date,
    pub is_active: bool,
    pub is_locked: bool,
    pub locked_at: Option<DateTimeWithTimeZone>,
    pub created_by: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::period_ledger_entries::Entity")]
    PeriodLedgerEntries,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::period_ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PeriodLedgerEntries.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
