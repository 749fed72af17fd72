//! Product catalog rules: boundary validation and stock levels.
//!
//! Pricing rules are soft-enforced here at the boundary, not as storage
//! constraints: a product must sell at or above cost, and quantities can
//! never be negative.

pub mod sku;

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures for product create/restock input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Product name is empty or whitespace.
    #[error("Product name is required")]
    EmptyName,

    /// Category is empty or whitespace.
    #[error("Category is required")]
    EmptyCategory,

    /// A price is negative.
    #[error("Prices must be non-negative, got {0}")]
    NegativePrice(Decimal),

    /// Selling below cost.
    #[error("Selling price {selling} is below cost price {cost}")]
    SellingBelowCost {
        /// Cost price supplied.
        cost: Decimal,
        /// Selling price supplied.
        selling: Decimal,
    },

    /// Stock quantity or minimum-stock threshold is negative.
    #[error("Stock quantities must be non-negative, got {0}")]
    NegativeStock(i32),
}

/// Product fields checked at the create/restock boundary.
#[derive(Debug, Clone)]
pub struct ProductInputFields<'a> {
    /// Display name.
    pub name: &'a str,
    /// Category label.
    pub category: &'a str,
    /// Cost price.
    pub cost_price: Decimal,
    /// Selling price.
    pub selling_price: Decimal,
    /// Initial or added stock.
    pub stock_quantity: i32,
    /// Low-stock threshold.
    pub min_stock: i32,
}

/// Validates product input before any store write.
///
/// # Errors
///
/// The first violated rule, in field order.
pub fn validate_product(fields: &ProductInputFields<'_>) -> Result<(), CatalogError> {
    if fields.name.trim().is_empty() {
        return Err(CatalogError::EmptyName);
    }
    if fields.category.trim().is_empty() {
        return Err(CatalogError::EmptyCategory);
    }
    if fields.cost_price < Decimal::ZERO {
        return Err(CatalogError::NegativePrice(fields.cost_price));
    }
    if fields.selling_price < Decimal::ZERO {
        return Err(CatalogError::NegativePrice(fields.selling_price));
    }
    if fields.selling_price < fields.cost_price {
        return Err(CatalogError::SellingBelowCost {
            cost: fields.cost_price,
            selling: fields.selling_price,
        });
    }
    if fields.stock_quantity < 0 {
        return Err(CatalogError::NegativeStock(fields.stock_quantity));
    }
    if fields.min_stock < 0 {
        return Err(CatalogError::NegativeStock(fields.min_stock));
    }
    Ok(())
}

/// Stock position of a product relative to its minimum-stock threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// No units on hand.
    Out,
    /// On hand, but at or below the minimum-stock threshold.
    Low,
    /// Comfortably stocked.
    Ok,
}

/// Classifies a product's stock position.
#[must_use]
pub fn classify_stock(quantity: i32, min_stock: i32) -> StockLevel {
    if quantity <= 0 {
        StockLevel::Out
    } else if quantity <= min_stock {
        StockLevel::Low
    } else {
        StockLevel::Ok
    }
}
