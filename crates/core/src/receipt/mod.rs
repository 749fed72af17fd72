//! Immutable receipt snapshot content and rendering.
//!
//! A receipt denormalizes everything a reprint needs at sale time: items,
//! totals, seller, optional customer, and the company block. The rendering
//! is plain text and deterministic, so a reprint years later is
//! byte-identical to the original.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tillbook_shared::{types::format_money, CompanyDetails};

/// One denormalized line of a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Product name at sale time.
    pub name: String,
    /// Product SKU at sale time.
    pub sku: String,
    /// Units sold.
    pub quantity: i32,
    /// Frozen unit price.
    pub unit_price: Decimal,
    /// `quantity x unit_price`.
    pub line_total: Decimal,
}

/// Optional customer block captured at sale time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    /// Customer name.
    pub name: Option<String>,
    /// Customer phone.
    pub phone: Option<String>,
    /// Customer email.
    pub email: Option<String>,
}

impl CustomerDetails {
    /// Whether any field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none()
    }
}

/// Everything a receipt records, assembled once at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptContent {
    /// Unique receipt number.
    pub receipt_number: String,
    /// Wall-clock time of the sale.
    pub transaction_date: DateTime<FixedOffset>,
    /// Who rang up the sale.
    pub seller_name: String,
    /// Optional customer block.
    pub customer: Option<CustomerDetails>,
    /// Denormalized line items.
    pub items: Vec<ReceiptItem>,
    /// Gross subtotal.
    pub subtotal: Decimal,
    /// Discount applied.
    pub discount: Decimal,
    /// `subtotal - discount`.
    pub net: Decimal,
    /// Payment method label (e.g. "cash").
    pub payment_method: String,
    /// Company block at sale time.
    pub company: CompanyDetails,
}

const WIDTH: usize = 42;

impl ReceiptContent {
    /// Renders the receipt as fixed-width plain text.
    #[must_use]
    pub fn render_text(&self) -> String {
        let rule = "-".repeat(WIDTH);
        let mut out = String::new();

        out.push_str(&center(&self.company.name));
        out.push_str(&center(&self.company.address));
        out.push_str(&center(&format!(
            "{} | {}",
            self.company.phone, self.company.email
        )));
        out.push_str(&rule);
        out.push('\n');

        out.push_str(&format!("Receipt : {}\n", self.receipt_number));
        out.push_str(&format!(
            "Date    : {}\n",
            self.transaction_date.format("%Y-%m-%d %H:%M")
        ));
        out.push_str(&format!("Seller  : {}\n", self.seller_name));
        if let Some(customer) = self.customer.as_ref().filter(|c| !c.is_empty()) {
            if let Some(name) = &customer.name {
                out.push_str(&format!("Customer: {name}\n"));
            }
            if let Some(phone) = &customer.phone {
                out.push_str(&format!("Phone   : {phone}\n"));
            }
        }
        out.push_str(&rule);
        out.push('\n');

        for item in &self.items {
            out.push_str(&format!("{} [{}]\n", item.name, item.sku));
            out.push_str(&two_columns(
                &format!("  {} x {}", item.quantity, format_money(item.unit_price)),
                &format_money(item.line_total),
            ));
        }
        out.push_str(&rule);
        out.push('\n');

        out.push_str(&two_columns("Subtotal", &format_money(self.subtotal)));
        if self.discount > Decimal::ZERO {
            out.push_str(&two_columns(
                "Discount",
                &format!("-{}", format_money(self.discount)),
            ));
        }
        out.push_str(&two_columns("TOTAL", &format_money(self.net)));
        out.push_str(&two_columns("Paid via", &self.payment_method));
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&center("Thank you for your business!"));

        out
    }
}

fn center(text: &str) -> String {
    if text.len() >= WIDTH {
        return format!("{text}\n");
    }
    let pad = (WIDTH - text.len()) / 2;
    format!("{}{text}\n", " ".repeat(pad))
}

fn two_columns(left: &str, right: &str) -> String {
    if left.len() + right.len() + 1 > WIDTH {
        return format!("{left} {right}\n");
    }
    let pad = WIDTH - left.len() - right.len();
    format!("{left}{}{right}\n", " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> ReceiptContent {
        ReceiptContent {
            receipt_number: "RCP20250315042".to_string(),
            transaction_date: DateTime::parse_from_rfc3339("2025-03-15T14:30:00+03:00").unwrap(),
            seller_name: "admin".to_string(),
            customer: Some(CustomerDetails {
                name: Some("Jane W.".to_string()),
                phone: Some("+254 711 000000".to_string()),
                email: None,
            }),
            items: vec![
                ReceiptItem {
                    name: "Maize Flour 2kg".to_string(),
                    sku: "FOO-MAI-001".to_string(),
                    quantity: 4,
                    unit_price: dec!(150.00),
                    line_total: dec!(600.00),
                },
                ReceiptItem {
                    name: "Cooking Oil 1L".to_string(),
                    sku: "FOO-COO-001".to_string(),
                    quantity: 1,
                    unit_price: dec!(250.00),
                    line_total: dec!(250.00),
                },
            ],
            subtotal: dec!(850.00),
            discount: dec!(50.00),
            net: dec!(800.00),
            payment_method: "cash".to_string(),
            company: CompanyDetails::default(),
        }
    }

    #[test]
    fn test_render_contains_all_figures() {
        let text = sample().render_text();
        assert!(text.contains("RCP20250315042"));
        assert!(text.contains("2025-03-15 14:30"));
        assert!(text.contains("Maize Flour 2kg [FOO-MAI-001]"));
        assert!(text.contains("4 x 150.00"));
        assert!(text.contains("850.00"));
        assert!(text.contains("-50.00"));
        assert!(text.contains("800.00"));
        assert!(text.contains("cash"));
        assert!(text.contains("Jane W."));
    }

    #[test]
    fn test_render_is_deterministic() {
        let content = sample();
        assert_eq!(content.render_text(), content.render_text());
    }

    #[test]
    fn test_render_omits_zero_discount_and_empty_customer() {
        let mut content = sample();
        content.discount = Decimal::ZERO;
        content.customer = Some(CustomerDetails::default());
        let text = content.render_text();
        assert!(!text.contains("Discount"));
        assert!(!text.contains("Customer:"));
    }

    #[test]
    fn test_round_trips_through_json() {
        let content = sample();
        let json = serde_json::to_string(&content.items).unwrap();
        let back: Vec<ReceiptItem> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content.items);
    }
}
