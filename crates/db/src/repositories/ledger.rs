//! Period ledger: inventory valuation, the opening/closing balance chain,
//! and stock carry-forward between periods.
//!
//! Balances are recomputed from scratch on every access rather than
//! incrementally maintained, and persisted only when a figure actually
//! changed. Monetary aggregation happens in Rust over fetched rows, never
//! as SQL-side SUM, so the backend's numeric affinity cannot contaminate
//! the decimals.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use tillbook_core::ledger::{
    balances_changed, carried_value, closing_balance, fold_sales_totals, starts_in_future,
    SaleLineFigures,
};
use tillbook_shared::types::round_money;

use crate::entities::{
    period_ledger_entries, period_stock_carry, periods, products, sea_orm_active_enums::EntryStatus,
    transaction_items, transactions,
};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Period not found.
    #[error("Period not found: {0}")]
    PeriodNotFound(Uuid),

    /// No ledger entry exists for the period.
    #[error("No ledger entry for period: {0}")]
    EntryNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LedgerError> for tillbook_shared::AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::PeriodNotFound(_) | LedgerError::EntryNotFound(_) => {
                Self::NotFound(message)
            }
            LedgerError::Database(_) => Self::Database(message),
        }
    }
}

/// Read model for external dashboards: one period's balances plus its
/// carry-forward audit trail.
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    /// The period's ledger entry.
    pub entry: period_ledger_entries::Model,
    /// Number of stock snapshots carried into this period.
    pub carried_count: usize,
    /// Total frozen value carried into this period.
    pub carried_value: Decimal,
}

/// Period ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Monetary value of on-hand stock: sum of
    /// `stock_quantity x cost_price` over products created within the
    /// window, or over the whole catalog when no window is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn value_of_stock(
        &self,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Decimal, LedgerError> {
        Ok(Self::value_of_stock_in(&self.db, window).await?)
    }

    async fn value_of_stock_in<C: ConnectionTrait>(
        conn: &C,
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Decimal, DbErr> {
        // Full scan by design: stock and pricing mutate via independent
        // paths, so recomputation avoids drift at this data scale.
        let all = products::Entity::find().all(conn).await?;
        let total = all
            .iter()
            .filter(|product| match window {
                Some((start, end)) => {
                    let created = product.created_at.date_naive();
                    created >= start && created <= end
                }
                None => true,
            })
            .map(|product| Decimal::from(product.stock_quantity) * product.cost_price)
            .sum();
        Ok(round_money(total))
    }

    /// Returns the ledger entry for a period, creating it lazily on first
    /// access. The boolean is `true` when the entry was created.
    ///
    /// Existing entries get their inventory valuation and closing balance
    /// recomputed, persisted only if a figure changed. A new entry opens
    /// with the closing balance of the most recent preceding entry (zero
    /// when there is none) and triggers stock carry-forward from that
    /// predecessor.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn get_or_create_entry(
        &self,
        period: &periods::Model,
    ) -> Result<(period_ledger_entries::Model, bool), LedgerError> {
        let window = Some((period.start_date, period.end_date));
        let current_inventory = self.value_of_stock(window).await?;

        if let Some(entry) = self.get_entry(period.id).await? {
            let closing = closing_balance(entry.opening_balance, current_inventory);
            if !balances_changed(
                entry.current_inventory,
                entry.closing_balance,
                current_inventory,
                closing,
            ) {
                return Ok((entry, false));
            }

            let mut active: period_ledger_entries::ActiveModel = entry.into();
            active.current_inventory = Set(current_inventory);
            active.closing_balance = Set(closing);
            active.updated_at = Set(Utc::now().into());
            let updated = active.update(&self.db).await?;
            debug!(period_id = %period.id, %closing, "refreshed ledger entry valuation");
            return Ok((updated, false));
        }

        let predecessor = self.preceding_entry(period).await?;
        let opening = predecessor
            .as_ref()
            .map_or(Decimal::ZERO, |(_, entry)| entry.closing_balance);
        let closing = closing_balance(opening, current_inventory);
        let status = if starts_in_future(period.start_date, Utc::now().date_naive()) {
            EntryStatus::Future
        } else {
            EntryStatus::Active
        };

        let now: DateTime<FixedOffset> = Utc::now().into();
        let txn = self.db.begin().await?;

        let entry = period_ledger_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            period_id: Set(period.id),
            opening_balance: Set(opening),
            current_inventory: Set(current_inventory),
            closing_balance: Set(closing),
            total_sales: Set(Decimal::ZERO),
            total_profit: Set(Decimal::ZERO),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if let Some((previous_period, _)) = &predecessor {
            let carried = Self::carry_forward_in(&txn, previous_period.id, period.id, now).await?;
            info!(
                from = %previous_period.label,
                to = %period.label,
                products = carried,
                "carried stock forward"
            );
        }

        txn.commit().await?;
        info!(period = %period.label, %opening, %closing, "created ledger entry");
        Ok((entry, true))
    }

    /// The most recent period before `period` (by `(year, month)` order,
    /// across gaps) that has a ledger entry, with that entry.
    async fn preceding_entry(
        &self,
        period: &periods::Model,
    ) -> Result<Option<(periods::Model, period_ledger_entries::Model)>, LedgerError> {
        let earlier = periods::Entity::find()
            .filter(
                sea_orm::Condition::any()
                    .add(periods::Column::Year.lt(period.year))
                    .add(
                        sea_orm::Condition::all()
                            .add(periods::Column::Year.eq(period.year))
                            .add(periods::Column::Month.lt(period.month)),
                    ),
            )
            .order_by_desc(periods::Column::Year)
            .order_by_desc(periods::Column::Month)
            .all(&self.db)
            .await?;

        for candidate in earlier {
            if let Some(entry) = self.get_entry(candidate.id).await? {
                return Ok(Some((candidate, entry)));
            }
        }
        Ok(None)
    }

    /// Snapshots every product with stock on hand into the carry audit
    /// trail for the destination period. Additive logging only: product
    /// stock numbers are untouched, and the snapshot values never change
    /// afterwards. Returns how many products were carried; a transition
    /// that was already carried is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn carry_forward(
        &self,
        from_period_id: Uuid,
        to_period_id: Uuid,
    ) -> Result<usize, LedgerError> {
        let txn = self.db.begin().await?;
        let carried =
            Self::carry_forward_in(&txn, from_period_id, to_period_id, Utc::now().into()).await?;
        txn.commit().await?;
        Ok(carried)
    }

    async fn carry_forward_in<C: ConnectionTrait>(
        conn: &C,
        from_period_id: Uuid,
        to_period_id: Uuid,
        now: DateTime<FixedOffset>,
    ) -> Result<usize, DbErr> {
        let already = period_stock_carry::Entity::find()
            .filter(period_stock_carry::Column::FromPeriodId.eq(from_period_id))
            .filter(period_stock_carry::Column::ToPeriodId.eq(to_period_id))
            .one(conn)
            .await?;
        if already.is_some() {
            return Ok(0);
        }

        let stocked = products::Entity::find()
            .filter(products::Column::StockQuantity.gt(0))
            .all(conn)
            .await?;

        let mut carried = 0usize;
        for product in stocked {
            period_stock_carry::ActiveModel {
                id: Set(Uuid::new_v4()),
                from_period_id: Set(from_period_id),
                to_period_id: Set(to_period_id),
                product_id: Set(product.id),
                quantity: Set(product.stock_quantity),
                unit_cost: Set(product.cost_price),
                carried_value: Set(carried_value(product.stock_quantity, product.cost_price)),
                carried_at: Set(now),
            }
            .insert(conn)
            .await?;
            carried += 1;
        }
        Ok(carried)
    }

    /// Closes a period's ledger entry: final valuation recompute, status
    /// `closed`, and if the successor period's entry already exists, its
    /// opening balance is overwritten with this closing balance (the
    /// copy-on-close invariant holds in both creation orders).
    ///
    /// # Errors
    ///
    /// `PeriodNotFound` for an unknown period; `EntryNotFound` when the
    /// period never had an entry materialized.
    pub async fn close_entry(
        &self,
        period_id: Uuid,
    ) -> Result<period_ledger_entries::Model, LedgerError> {
        let period = periods::Entity::find_by_id(period_id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::PeriodNotFound(period_id))?;

        let (entry, _) = self.get_or_create_entry(&period).await?;
        let closing = entry.closing_balance;

        let mut active: period_ledger_entries::ActiveModel = entry.into();
        active.status = Set(EntryStatus::Closed);
        active.updated_at = Set(Utc::now().into());
        let closed = active.update(&self.db).await?;

        if let Some((successor_period, successor_entry)) = self.following_entry(&period).await? {
            let successor_closing = closing_balance(closing, successor_entry.current_inventory);
            let mut active: period_ledger_entries::ActiveModel = successor_entry.into();
            active.opening_balance = Set(closing);
            active.closing_balance = Set(successor_closing);
            active.updated_at = Set(Utc::now().into());
            active.update(&self.db).await?;
            debug!(
                period = %successor_period.label,
                opening = %closing,
                "copied closing balance into successor opening"
            );
        }

        info!(period = %period.label, %closing, "closed ledger entry");
        Ok(closed)
    }

    /// The earliest period after `period` that has a ledger entry.
    async fn following_entry(
        &self,
        period: &periods::Model,
    ) -> Result<Option<(periods::Model, period_ledger_entries::Model)>, LedgerError> {
        let later = periods::Entity::find()
            .filter(
                sea_orm::Condition::any()
                    .add(periods::Column::Year.gt(period.year))
                    .add(
                        sea_orm::Condition::all()
                            .add(periods::Column::Year.eq(period.year))
                            .add(periods::Column::Month.gt(period.month)),
                    ),
            )
            .order_by_asc(periods::Column::Year)
            .order_by_asc(periods::Column::Month)
            .all(&self.db)
            .await?;

        for candidate in later {
            if let Some(entry) = self.get_entry(candidate.id).await? {
                return Ok(Some((candidate, entry)));
            }
        }
        Ok(None)
    }

    /// Recomputes a period's `total_sales` and `total_profit` from its
    /// transaction lines, writing only on change. Profit joins each
    /// product's current cost price; only the selling price is frozen per
    /// line.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn refresh_sales_totals(
        &self,
        period_id: Uuid,
    ) -> Result<Option<period_ledger_entries::Model>, LedgerError> {
        Ok(Self::refresh_sales_totals_in(&self.db, period_id).await?)
    }

    /// Transaction-scoped variant used inside the sale commit unit of
    /// work.
    pub(crate) async fn refresh_sales_totals_in<C: ConnectionTrait>(
        conn: &C,
        period_id: Uuid,
    ) -> Result<Option<period_ledger_entries::Model>, DbErr> {
        let Some(entry) = period_ledger_entries::Entity::find()
            .filter(period_ledger_entries::Column::PeriodId.eq(period_id))
            .one(conn)
            .await?
        else {
            return Ok(None);
        };

        let headers = transactions::Entity::find()
            .filter(transactions::Column::PeriodId.eq(period_id))
            .all(conn)
            .await?;

        let mut figures = Vec::new();
        for header in &headers {
            let items = transaction_items::Entity::find()
                .filter(transaction_items::Column::TransactionId.eq(header.id))
                .all(conn)
                .await?;
            for item in items {
                let cost_price = products::Entity::find_by_id(item.product_id)
                    .one(conn)
                    .await?
                    .map_or(Decimal::ZERO, |product| product.cost_price);
                figures.push(SaleLineFigures {
                    line_total: item.line_total,
                    quantity: item.quantity,
                    cost_price,
                });
            }
        }

        let (total_sales, total_profit) = fold_sales_totals(figures);
        if entry.total_sales == total_sales && entry.total_profit == total_profit {
            return Ok(Some(entry));
        }

        let mut active: period_ledger_entries::ActiveModel = entry.into();
        active.total_sales = Set(total_sales);
        active.total_profit = Set(total_profit);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(conn).await?;
        debug!(%period_id, %total_sales, %total_profit, "refreshed sales totals");
        Ok(Some(updated))
    }

    /// The ledger entry for a period, if one has been materialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_entry(
        &self,
        period_id: Uuid,
    ) -> Result<Option<period_ledger_entries::Model>, LedgerError> {
        let entry = period_ledger_entries::Entity::find()
            .filter(period_ledger_entries::Column::PeriodId.eq(period_id))
            .one(&self.db)
            .await?;
        Ok(entry)
    }

    /// Stock snapshots carried into a period, insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn carried_records(
        &self,
        to_period_id: Uuid,
    ) -> Result<Vec<period_stock_carry::Model>, LedgerError> {
        let records = period_stock_carry::Entity::find()
            .filter(period_stock_carry::Column::ToPeriodId.eq(to_period_id))
            .all(&self.db)
            .await?;
        Ok(records)
    }

    /// Read-only balance and carry figures for one period, for external
    /// dashboards.
    ///
    /// # Errors
    ///
    /// `EntryNotFound` when the period has no materialized entry.
    pub async fn period_summary(&self, period_id: Uuid) -> Result<PeriodSummary, LedgerError> {
        let entry = self
            .get_entry(period_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(period_id))?;
        let records = self.carried_records(period_id).await?;
        let carried_value = round_money(records.iter().map(|record| record.carried_value).sum());

        Ok(PeriodSummary {
            entry,
            carried_count: records.len(),
            carried_value,
        })
    }
}
