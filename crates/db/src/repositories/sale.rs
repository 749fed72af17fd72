//! Sale transaction engine: converts a validated cart into a durable,
//! atomic sale.
//!
//! The commit writes the header, line items, stock decrements, and the
//! receipt snapshot inside one database transaction; any failure rolls the
//! whole unit of work back, so no partial sale is ever observable. Stock
//! is re-checked at commit time with a guarded conditional update, because
//! add-time and commit-time can be arbitrarily far apart.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use tillbook_core::checkout::{
    self, Cart, CheckoutError, ProductSnapshot, ReceiptNumberGenerator, SalePreview,
};
use tillbook_core::period::{authorize_mutation, PeriodLockError};
use tillbook_core::receipt::{CustomerDetails, ReceiptContent, ReceiptItem};
use tillbook_shared::CompanyDetails;

use crate::entities::{
    periods, products, receipts, sea_orm_active_enums::PaymentMethod, transaction_items,
    transactions,
};

use super::ledger::{LedgerError, LedgerRepository};

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Cart/preview validation failure.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Commit rejected because the period is locked.
    #[error(transparent)]
    PeriodLocked(#[from] PeriodLockError),

    /// The reserved receipt number was taken between preview and commit.
    #[error("Receipt number already exists: {0}")]
    ReceiptNumberTaken(String),

    /// A concurrent sale made stock insufficient between preview and
    /// commit.
    #[error("Stock conflict on product {product_id}: {requested} requested")]
    StockConflict {
        /// Product whose guarded decrement matched no row.
        product_id: Uuid,
        /// Units the failing line needed.
        requested: i32,
    },

    /// The cart changed after the preview was computed.
    #[error("Cart changed after preview, run preview again")]
    PreviewOutOfDate,

    /// Ledger bookkeeping failed while preparing the commit.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Receipt snapshot serialization failed.
    #[error("Receipt snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SaleError> for tillbook_shared::AppError {
    fn from(err: SaleError) -> Self {
        let message = err.to_string();
        match err {
            SaleError::ProductNotFound(_) => Self::NotFound(message),
            SaleError::Checkout(CheckoutError::InsufficientStock { .. }) => {
                Self::InsufficientStock(message)
            }
            SaleError::Checkout(_) | SaleError::PreviewOutOfDate => Self::Validation(message),
            SaleError::PeriodLocked(_) => Self::PeriodLocked(message),
            SaleError::ReceiptNumberTaken(_) => Self::AlreadyExists(message),
            SaleError::StockConflict { .. } => Self::StockConflict(message),
            SaleError::Ledger(inner) => inner.into(),
            SaleError::Snapshot(_) => Self::Internal(message),
            SaleError::Database(_) => Self::Database(message),
        }
    }
}

/// Collaborator inputs for one commit, supplied by the embedding handler.
#[derive(Debug, Clone)]
pub struct CommitContext {
    /// Actor identity from the external auth layer; also the seller name
    /// on the receipt.
    pub recorded_by: String,
    /// Privileged callers may commit into a locked period, flagged with
    /// an override warning.
    pub privileged: bool,
    /// Wall-clock time of the sale.
    pub now: DateTime<FixedOffset>,
    /// How the sale was paid.
    pub payment_method: PaymentMethod,
    /// Optional customer block for the receipt.
    pub customer: Option<CustomerDetails>,
    /// Company block denormalized into the receipt.
    pub company: CompanyDetails,
}

/// A durably committed sale.
#[derive(Debug, Clone)]
pub struct CommittedSale {
    /// The persisted header.
    pub transaction: transactions::Model,
    /// The persisted line items.
    pub items: Vec<transaction_items::Model>,
    /// The immutable receipt snapshot.
    pub receipt: receipts::Model,
    /// Present when a privileged caller committed into a locked period.
    pub override_warning: Option<String>,
}

/// Sale transaction repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a product line to the cart, freezing the current selling
    /// price into the line.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` for an unknown product; cart validation errors
    /// (`InvalidQuantity`, `InsufficientStock`) pass through.
    pub async fn add_line(
        &self,
        cart: &mut Cart,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), SaleError> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(SaleError::ProductNotFound(product_id))?;

        let snapshot = ProductSnapshot {
            product_id: product.id,
            name: product.name,
            sku: product.sku,
            unit_price: product.selling_price,
            available_stock: product.stock_quantity,
        };
        cart.add(&snapshot, quantity)?;
        Ok(())
    }

    /// Computes totals and reserves a collision-free receipt number.
    /// No persisted state is touched.
    ///
    /// # Errors
    ///
    /// `EmptyCart`/`InvalidDiscount` from the cart math;
    /// `ReceiptNumbersExhausted` when the generator kept colliding.
    pub async fn preview(
        &self,
        cart: &Cart,
        discount: Decimal,
        date: NaiveDate,
        generator: &mut dyn ReceiptNumberGenerator,
    ) -> Result<SalePreview, SaleError> {
        let taken: HashSet<String> = transactions::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|header| header.receipt_number)
            .collect();

        let number = checkout::reserve_receipt_number(generator, date, |candidate| {
            taken.contains(candidate)
        })?;
        Ok(checkout::preview(cart, discount, number)?)
    }

    /// Commits a previewed cart as one atomic unit of work: header, line
    /// items with frozen prices, guarded stock decrements, the immutable
    /// receipt snapshot, and the period's sales-total refresh. On success
    /// the cart is cleared; on any failure nothing is persisted.
    ///
    /// A locked owning period blocks regular callers with `PeriodLocked`
    /// before any write; privileged callers proceed and the result carries
    /// an administrative-override warning.
    ///
    /// # Errors
    ///
    /// See the error enum; every mid-commit failure rolls the unit of
    /// work back entirely.
    pub async fn commit(
        &self,
        cart: &mut Cart,
        preview: &SalePreview,
        ctx: CommitContext,
    ) -> Result<CommittedSale, SaleError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart.into());
        }
        if cart.subtotal() != preview.subtotal {
            return Err(SaleError::PreviewOutOfDate);
        }

        let active = periods::Entity::find()
            .filter(periods::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;

        let override_warning = self.check_lock_policy(&active, &ctx).await?;

        // Materialize the owning period's ledger entry before the commit
        // so the totals refresh inside the transaction finds it.
        if let Some(period) = &active {
            let ledger = LedgerRepository::new(self.db.clone());
            ledger.get_or_create_entry(period).await?;
        }

        let txn = self.db.begin().await?;

        let already = transactions::Entity::find()
            .filter(transactions::Column::ReceiptNumber.eq(&preview.receipt_number))
            .one(&txn)
            .await?;
        if already.is_some() {
            return Err(SaleError::ReceiptNumberTaken(preview.receipt_number.clone()));
        }

        let period_id = active.as_ref().map(|period| period.id);
        let header = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            receipt_number: Set(preview.receipt_number.clone()),
            total_amount: Set(preview.subtotal),
            discount_amount: Set(preview.discount),
            net_amount: Set(preview.net),
            payment_method: Set(ctx.payment_method.clone()),
            transaction_date: Set(ctx.now),
            period_id: Set(period_id),
            recorded_by: Set(ctx.recorded_by.clone()),
            created_at: Set(ctx.now),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(cart.lines().len());
        for line in cart.lines() {
            let item = transaction_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                transaction_id: Set(header.id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                line_total: Set(line.line_total()),
            }
            .insert(&txn)
            .await?;
            items.push(item);

            Self::decrement_stock(&txn, line.product_id, line.quantity, ctx.now).await?;
        }

        let content = Self::build_receipt_content(cart, preview, &ctx);
        let receipt = receipts::ActiveModel {
            id: Set(Uuid::new_v4()),
            transaction_id: Set(header.id),
            receipt_number: Set(preview.receipt_number.clone()),
            customer_name: Set(content.customer.as_ref().and_then(|c| c.name.clone())),
            customer_phone: Set(content.customer.as_ref().and_then(|c| c.phone.clone())),
            customer_email: Set(content.customer.as_ref().and_then(|c| c.email.clone())),
            seller_name: Set(content.seller_name.clone()),
            total_amount: Set(preview.subtotal),
            discount_amount: Set(preview.discount),
            net_amount: Set(preview.net),
            payment_method: Set(ctx.payment_method.clone()),
            transaction_date: Set(ctx.now),
            items_json: Set(serde_json::to_value(&content.items)?),
            rendered_text: Set(content.render_text()),
            company_json: Set(serde_json::to_value(&content.company)?),
            period_id: Set(period_id),
            created_at: Set(ctx.now),
        }
        .insert(&txn)
        .await?;

        if let Some(period_id) = period_id {
            LedgerRepository::refresh_sales_totals_in(&txn, period_id).await?;
        }

        txn.commit().await?;
        cart.clear();

        match &override_warning {
            Some(warning) => warn!(
                receipt = %header.receipt_number,
                %warning,
                "sale committed under admin override"
            ),
            None => info!(
                receipt = %header.receipt_number,
                net = %header.net_amount,
                "sale committed"
            ),
        }

        Ok(CommittedSale {
            transaction: header,
            items,
            receipt,
            override_warning,
        })
    }

    /// Applies the lock policy for the period covering the commit time
    /// (falling back to the active period when no period covers it).
    async fn check_lock_policy(
        &self,
        active: &Option<periods::Model>,
        ctx: &CommitContext,
    ) -> Result<Option<String>, SaleError> {
        let covering = periods::Entity::find()
            .filter(periods::Column::StartDate.lte(ctx.now.date_naive()))
            .filter(periods::Column::EndDate.gte(ctx.now.date_naive()))
            .one(&self.db)
            .await?;

        let Some(period) = covering.or_else(|| active.clone()) else {
            return Ok(None);
        };
        let grant = authorize_mutation(&period.label, period.is_locked, ctx.privileged)?;
        Ok(grant.warning().map(str::to_string))
    }

    /// Guarded decrement: matches only while stock is still sufficient,
    /// so a concurrent sale that drained the product surfaces as
    /// `StockConflict` and rolls the unit of work back.
    async fn decrement_stock(
        txn: &DatabaseTransaction,
        product_id: Uuid,
        quantity: i32,
        now: DateTime<FixedOffset>,
    ) -> Result<(), SaleError> {
        let result = products::Entity::update_many()
            .col_expr(
                products::Column::StockQuantity,
                Expr::col(products::Column::StockQuantity).sub(quantity),
            )
            .col_expr(products::Column::UpdatedAt, Expr::value(now))
            .filter(products::Column::Id.eq(product_id))
            .filter(products::Column::StockQuantity.gte(quantity))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(SaleError::StockConflict {
                product_id,
                requested: quantity,
            });
        }
        Ok(())
    }

    fn build_receipt_content(
        cart: &Cart,
        preview: &SalePreview,
        ctx: &CommitContext,
    ) -> ReceiptContent {
        let items = cart
            .lines()
            .iter()
            .map(|line| ReceiptItem {
                name: line.name.clone(),
                sku: line.sku.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                line_total: line.line_total(),
            })
            .collect();

        ReceiptContent {
            receipt_number: preview.receipt_number.clone(),
            transaction_date: ctx.now,
            seller_name: ctx.recorded_by.clone(),
            customer: ctx.customer.clone(),
            items,
            subtotal: preview.subtotal,
            discount: preview.discount,
            net: preview.net,
            payment_method: ctx.payment_method.label().to_string(),
            company: ctx.company.clone(),
        }
    }

    /// Finds a sale header by its receipt number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_receipt_number(
        &self,
        receipt_number: &str,
    ) -> Result<Option<transactions::Model>, SaleError> {
        let header = transactions::Entity::find()
            .filter(transactions::Column::ReceiptNumber.eq(receipt_number))
            .one(&self.db)
            .await?;
        Ok(header)
    }

    /// Line items of a sale, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn items_for(
        &self,
        transaction_id: Uuid,
    ) -> Result<Vec<transaction_items::Model>, SaleError> {
        let items = transaction_items::Entity::find()
            .filter(transaction_items::Column::TransactionId.eq(transaction_id))
            .all(&self.db)
            .await?;
        Ok(items)
    }

    /// The immutable receipt snapshot of a sale, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn receipt_for(
        &self,
        transaction_id: Uuid,
    ) -> Result<Option<receipts::Model>, SaleError> {
        let receipt = receipts::Entity::find()
            .filter(receipts::Column::TransactionId.eq(transaction_id))
            .one(&self.db)
            .await?;
        Ok(receipt)
    }

    /// Sale headers recorded in a period, chronological.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn sales_for_period(
        &self,
        period_id: Uuid,
    ) -> Result<Vec<transactions::Model>, SaleError> {
        let headers = transactions::Entity::find()
            .filter(transactions::Column::PeriodId.eq(period_id))
            .order_by_asc(transactions::Column::TransactionDate)
            .all(&self.db)
            .await?;
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tillbook_shared::AppError;

    #[test]
    fn test_boundary_mapping_keeps_http_semantics() {
        let conflict: AppError = SaleError::StockConflict {
            product_id: Uuid::new_v4(),
            requested: 3,
        }
        .into();
        assert_eq!(conflict.status_code(), 409);
        assert_eq!(conflict.error_code(), "STOCK_CONFLICT");

        let locked: AppError = SaleError::PeriodLocked(PeriodLockError {
            label: "March 2025".to_string(),
        })
        .into();
        assert_eq!(locked.status_code(), 423);

        let short: AppError = SaleError::Checkout(CheckoutError::InsufficientStock {
            requested: 6,
            available: 5,
        })
        .into();
        assert_eq!(short.status_code(), 422);

        let stale: AppError = SaleError::PreviewOutOfDate.into();
        assert_eq!(stale.error_code(), "VALIDATION_ERROR");
    }
}
