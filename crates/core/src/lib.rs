//! Core business logic for Tillbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `period` - Accounting period calendar math and lock policy
//! - `ledger` - Opening/closing balance and carry-forward arithmetic
//! - `checkout` - Cart, sale preview, and receipt number reservation
//! - `catalog` - Product validation, SKU generation, and stock levels
//! - `receipt` - Immutable receipt snapshot content and rendering

pub mod catalog;
pub mod checkout;
pub mod ledger;
pub mod period;
pub mod receipt;
