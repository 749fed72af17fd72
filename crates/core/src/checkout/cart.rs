//! The in-progress cart and the preview step.
//!
//! Prices are frozen into cart lines at add-time; a later product price
//! change never alters a line already in the cart. Stock is re-checked
//! again at commit time by the sale repository, because add-time and
//! commit-time can be arbitrarily far apart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tillbook_shared::types::round_money;
use uuid::Uuid;

use super::error::CheckoutError;
use crate::ledger::line_total;

/// The slice of a product a cart line needs, captured when the line is
/// added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product identifier.
    pub product_id: Uuid,
    /// Display name at add-time.
    pub name: String,
    /// SKU at add-time.
    pub sku: String,
    /// Selling price frozen into the line.
    pub unit_price: Decimal,
    /// Units on hand when the snapshot was taken.
    pub available_stock: i32,
}

/// One line of an in-progress cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product the line sells.
    pub product_id: Uuid,
    /// Product name at add-time.
    pub name: String,
    /// Product SKU at add-time.
    pub sku: String,
    /// Accumulated quantity across merged adds.
    pub quantity: i32,
    /// Frozen unit price.
    pub unit_price: Decimal,
}

impl CartLine {
    /// `quantity x unit_price`, on the money scale.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        line_total(self.quantity, self.unit_price)
    }
}

/// An uncommitted collection of sale lines.
///
/// Owned by the caller (e.g. kept in an external session store between
/// requests); the core stays stateless between calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` units of a product, merging into an existing line
    /// for the same product.
    ///
    /// # Errors
    ///
    /// `InvalidQuantity` if `quantity <= 0`; `InsufficientStock` if the
    /// merged line quantity would exceed the snapshot's available stock.
    pub fn add(&mut self, product: &ProductSnapshot, quantity: i32) -> Result<(), CheckoutError> {
        if quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity(quantity));
        }

        let already = self
            .lines
            .iter()
            .find(|line| line.product_id == product.product_id)
            .map_or(0, |line| line.quantity);
        let requested = already + quantity;
        if requested > product.available_stock {
            return Err(CheckoutError::InsufficientStock {
                requested,
                available: product.available_stock,
            });
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.product_id)
        {
            line.quantity = requested;
        } else {
            self.lines.push(CartLine {
                product_id: product.product_id,
                name: product.name.clone(),
                sku: product.sku.clone(),
                quantity,
                unit_price: product.unit_price,
            });
        }
        Ok(())
    }

    /// Removes the line for a product, if present.
    pub fn remove(&mut self, product_id: Uuid) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Drops every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The cart's lines, in add order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of line totals, on the money scale.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        round_money(self.lines.iter().map(CartLine::line_total).sum())
    }
}

/// Computed totals and the reserved receipt number for a checkout attempt.
///
/// Produced by [`preview`]; consumed by the sale repository's commit or
/// discarded by [`cancel`]. Nothing is persisted while a preview exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalePreview {
    /// Reserved receipt number (re-checked for uniqueness at commit).
    pub receipt_number: String,
    /// Gross subtotal across all lines.
    pub subtotal: Decimal,
    /// Discount applied to the subtotal.
    pub discount: Decimal,
    /// `subtotal - discount`.
    pub net: Decimal,
}

/// Computes totals for a cart and binds them to a reserved receipt number.
///
/// Pure: no persisted state is touched.
///
/// # Errors
///
/// `EmptyCart` if the cart has no lines; `InvalidDiscount` if the discount
/// is negative or exceeds the subtotal.
pub fn preview(
    cart: &Cart,
    discount: Decimal,
    receipt_number: String,
) -> Result<SalePreview, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let subtotal = cart.subtotal();
    if discount < Decimal::ZERO || discount > subtotal {
        return Err(CheckoutError::InvalidDiscount { discount, subtotal });
    }

    Ok(SalePreview {
        receipt_number,
        subtotal,
        discount: round_money(discount),
        net: round_money(subtotal - discount),
    })
}

/// Discards a preview; the cart it was computed from is untouched.
///
/// Cancellation is a "go back", not an abandonment: nothing was persisted
/// during preview, so there is nothing to unwind.
pub fn cancel(preview: SalePreview) {
    drop(preview);
}


#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        /// Merging adds accumulates quantity and keeps one line per
        /// product, and the subtotal is always the sum of line totals.
        #[test]
        fn prop_merge_accumulates(
            price in price_strategy(),
            adds in proptest::collection::vec(1i32..=20, 1..=10),
        ) {
            let total: i32 = adds.iter().sum();
            let product = ProductSnapshot {
                product_id: Uuid::new_v4(),
                name: "P".to_string(),
                sku: "GEN-P-001".to_string(),
                unit_price: price,
                available_stock: total,
            };

            let mut cart = Cart::new();
            for qty in &adds {
                cart.add(&product, *qty).unwrap();
            }

            prop_assert_eq!(cart.lines().len(), 1);
            prop_assert_eq!(cart.lines()[0].quantity, total);
            prop_assert_eq!(cart.subtotal(), Decimal::from(total) * price);
        }

        /// An add that would overrun stock fails and leaves the cart
        /// exactly as it was.
        #[test]
        fn prop_overrun_leaves_cart_unchanged(
            price in price_strategy(),
            stock in 1i32..=50,
            extra in 1i32..=50,
        ) {
            let product = ProductSnapshot {
                product_id: Uuid::new_v4(),
                name: "P".to_string(),
                sku: "GEN-P-001".to_string(),
                unit_price: price,
                available_stock: stock,
            };

            let mut cart = Cart::new();
            cart.add(&product, stock).unwrap();
            let before = cart.clone();

            prop_assert!(cart.add(&product, extra).is_err());
            prop_assert_eq!(cart, before);
        }

        /// Valid discounts always satisfy `net == subtotal - discount`
        /// and out-of-range discounts are always rejected.
        #[test]
        fn prop_discount_bounds(
            price in price_strategy(),
            quantity in 1i32..=100,
            discount_cents in 0i64..=200_000_000,
        ) {
            let product = ProductSnapshot {
                product_id: Uuid::new_v4(),
                name: "P".to_string(),
                sku: "GEN-P-001".to_string(),
                unit_price: price,
                available_stock: quantity,
            };
            let mut cart = Cart::new();
            cart.add(&product, quantity).unwrap();

            let discount = Decimal::new(discount_cents, 2);
            let result = preview(&cart, discount, "RCP20250101001".to_string());
            if discount <= cart.subtotal() {
                let p = result.unwrap();
                prop_assert_eq!(p.net, p.subtotal - p.discount);
            } else {
                prop_assert!(
                    matches!(result, Err(CheckoutError::InvalidDiscount { .. })),
                    "expected InvalidDiscount error"
                );
            }
        }
    }
}
