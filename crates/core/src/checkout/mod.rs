//! Point-of-sale checkout state machine.
//!
//! A checkout attempt moves `Cart -> SalePreview -> commit | cancel`. The
//! cart and preview are plain values owned by the caller (nothing here
//! touches storage); the db layer's sale repository performs the atomic
//! commit. Cancelling a preview is a local discard and keeps the cart.

pub mod cart;
pub mod error;
pub mod receipt_number;

pub use cart::{cancel, preview, Cart, CartLine, ProductSnapshot, SalePreview};
pub use error::CheckoutError;
pub use receipt_number::{
    reserve_receipt_number, RandomReceiptNumbers, ReceiptNumberGenerator,
    MAX_RECEIPT_NUMBER_ATTEMPTS,
};
