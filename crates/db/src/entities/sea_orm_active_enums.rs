//! String-backed enums shared by the entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a period ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// The period is open and its balances are live.
    #[sea_orm(string_value = "active")]
    Active,
    /// The period's books are final.
    #[sea_orm(string_value = "closed")]
    Closed,
    /// The period has not started yet.
    #[sea_orm(string_value = "future")]
    Future,
}

/// How a sale was paid.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the till.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Mobile money transfer.
    #[sea_orm(string_value = "mobile_money")]
    MobileMoney,
}

impl PaymentMethod {
    /// Lowercase label used on rendered receipts.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::MobileMoney => "mobile money",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Cash
    }
}
