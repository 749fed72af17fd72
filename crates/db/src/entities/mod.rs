//! `SeaORM` entity definitions for the ledger schema.

pub mod period_ledger_entries;
pub mod period_stock_carry;
pub mod periods;
pub mod products;
pub mod receipts;
pub mod sea_orm_active_enums;
pub mod transaction_items;
pub mod transactions;
