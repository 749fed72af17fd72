//! `SeaORM` Entity for the receipts table.
//!
//! A receipt is a write-once denormalized snapshot of a committed sale,
//! kept for reprint and audit. Nothing updates these rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    #[sea_orm(unique)]
    pub receipt_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub seller_name: String,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub net_amount: Decimal,
    pub payment_method: PaymentMethod,
    pub transaction_date: DateTimeWithTimeZone,
    pub items_json: Json,
    #[sea_orm(column_type = "Text")]
    pub rendered_text: String,
    pub company_json: Json,
    pub period_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id"
    )]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
