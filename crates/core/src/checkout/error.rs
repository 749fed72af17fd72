//! Error types for checkout operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures raised before any store write is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Quantity must be a positive whole number of units.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    /// Requested more units than the product has on hand.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units the cart would hold after the add.
        requested: i32,
        /// Units on hand when the line was added.
        available: i32,
    },

    /// A preview or commit was attempted on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Discount is negative or exceeds the cart subtotal.
    #[error("Invalid discount {discount} for subtotal {subtotal}")]
    InvalidDiscount {
        /// Discount requested.
        discount: Decimal,
        /// Cart subtotal the discount was checked against.
        subtotal: Decimal,
    },

    /// Receipt-number generation kept colliding past the retry budget.
    #[error("Could not reserve a receipt number after {attempts} attempts")]
    ReceiptNumbersExhausted {
        /// Attempts made before giving up.
        attempts: u32,
    },
}
