//! Balance identities for period ledger entries.
//!
//! Every monetary figure is a two-decimal `Decimal`; change detection is
//! exact equality, never epsilon tolerance. The closing identity
//! `closing == opening + current_inventory` must hold bit-for-bit across
//! repeated recomputation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tillbook_shared::types::round_money;

/// Derives the closing balance from an opening balance and the current
/// inventory valuation.
#[must_use]
pub fn closing_balance(opening: Decimal, current_inventory: Decimal) -> Decimal {
    round_money(opening + current_inventory)
}

/// Whether a recomputed valuation differs from the persisted one.
///
/// Exact decimal comparison; used to skip writes when nothing moved.
#[must_use]
pub fn balances_changed(
    stored_inventory: Decimal,
    stored_closing: Decimal,
    inventory: Decimal,
    closing: Decimal,
) -> bool {
    stored_inventory != inventory || stored_closing != closing
}

/// Value of a stock snapshot at carry time: `quantity x unit_cost`.
///
/// Frozen into the carry record at insert; never recomputed afterwards.
#[must_use]
pub fn carried_value(quantity: i32, unit_cost: Decimal) -> Decimal {
    round_money(Decimal::from(quantity) * unit_cost)
}

/// Line total for a sale line: `quantity x unit_price`.
#[must_use]
pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    round_money(Decimal::from(quantity) * unit_price)
}

/// Profit attributed to one sale line, against the product's current cost.
#[must_use]
pub fn line_profit(line_total: Decimal, quantity: i32, cost_price: Decimal) -> Decimal {
    round_money(line_total - Decimal::from(quantity) * cost_price)
}

/// Whether a period starting on `period_start` is still in the future.
///
/// A future period's ledger entry is created with status `future` rather
/// than `active`.
#[must_use]
pub fn starts_in_future(period_start: NaiveDate, today: NaiveDate) -> bool {
    period_start > today
}

/// The figures of one sale line that feed the period's sales totals.
#[derive(Debug, Clone, Copy)]
pub struct SaleLineFigures {
    /// Frozen line total (`quantity x unit_price` at sale time).
    pub line_total: Decimal,
    /// Units sold.
    pub quantity: i32,
    /// The product's current cost price (live join, not frozen).
    pub cost_price: Decimal,
}

/// Folds sale lines into `(total_sales, total_profit)` for a period.
#[must_use]
pub fn fold_sales_totals<I>(lines: I) -> (Decimal, Decimal)
where
    I: IntoIterator<Item = SaleLineFigures>,
{
    let mut sales = Decimal::ZERO;
    let mut profit = Decimal::ZERO;
    for line in lines {
        sales += line.line_total;
        profit += line_profit(line.line_total, line.quantity, line.cost_price);
    }
    (round_money(sales), round_money(profit))
}
