//! Opening/closing balance and carry-forward arithmetic.
//!
//! Pure decimal math for the period ledger. The repository layer decides
//! when to persist; the identities live here so they can be property-tested
//! without a database.

pub mod balance;

pub use balance::{
    balances_changed, carried_value, closing_balance, fold_sales_totals, line_profit, line_total,
    starts_in_future, SaleLineFigures,
};
