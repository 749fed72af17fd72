//! Accounting period management.
//!
//! A period is one calendar month: the unit balances are scoped to and the
//! unit that gets locked once its books are final.

pub mod calendar;
pub mod policy;

pub use calendar::{month_bounds, month_label, next_month, MonthRef};
pub use policy::{authorize_mutation, MutationGrant, PeriodLockError};
