//! Product catalog repository: create/restock with SKU generation, lock-
//! policy-guarded edits, and stock listings.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{info, warn};
use uuid::Uuid;

use tillbook_core::catalog::{
    classify_stock, sku, validate_product, CatalogError, ProductInputFields, StockLevel,
};
use tillbook_core::period::{authorize_mutation, PeriodLockError};
use tillbook_shared::types::round_money;

use crate::entities::{periods, products};

/// Error types for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// SKU already in use.
    #[error("SKU already exists: {0}")]
    DuplicateSku(String),

    /// Boundary validation failure.
    #[error(transparent)]
    Invalid(#[from] CatalogError),

    /// Mutation rejected because the owning period is locked.
    #[error(transparent)]
    PeriodLocked(#[from] PeriodLockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ProductError> for tillbook_shared::AppError {
    fn from(err: ProductError) -> Self {
        let message = err.to_string();
        match err {
            ProductError::NotFound(_) => Self::NotFound(message),
            ProductError::DuplicateSku(_) => Self::AlreadyExists(message),
            ProductError::Invalid(_) => Self::Validation(message),
            ProductError::PeriodLocked(_) => Self::PeriodLocked(message),
            ProductError::Database(_) => Self::Database(message),
        }
    }
}

/// Input for creating or restocking a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Explicit SKU; generated from category/name when absent.
    pub sku: Option<String>,
    /// Cost price.
    pub cost_price: Decimal,
    /// Selling price (must be >= cost).
    pub selling_price: Decimal,
    /// Initial stock, or stock to add on restock.
    pub stock_quantity: i32,
    /// Low-stock threshold.
    pub min_stock: i32,
    /// Owning period, typically the active one.
    pub period_id: Option<Uuid>,
    /// Actor identity from the external auth layer.
    pub created_by: String,
}

/// Whether a restock matched an existing product or created a new one.
#[derive(Debug, Clone)]
pub enum RestockOutcome {
    /// No product matched on (name, category); a new one was created.
    Created(products::Model),
    /// Stock was added to an existing product and its details refreshed.
    Restocked(products::Model),
}

impl RestockOutcome {
    /// The resulting product row either way.
    #[must_use]
    pub fn product(&self) -> &products::Model {
        match self {
            Self::Created(product) | Self::Restocked(product) => product,
        }
    }
}

/// Editable product fields for [`ProductRepository::adjust_details`].
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    /// New selling price.
    pub selling_price: Option<Decimal>,
    /// New cost price.
    pub cost_price: Option<Decimal>,
    /// New low-stock threshold.
    pub min_stock: Option<i32>,
}

/// Catalog-wide counts for external dashboards.
#[derive(Debug, Clone)]
pub struct CatalogSummary {
    /// Total number of products.
    pub product_count: usize,
    /// Global stock valuation (`stock_quantity x cost_price` over all).
    pub stock_value: Decimal,
    /// Products at or below their minimum-stock threshold.
    pub low_stock_count: usize,
    /// Products with no units on hand.
    pub out_of_stock_count: usize,
}

/// Product catalog repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product after boundary validation, generating a SKU when
    /// none was supplied.
    ///
    /// # Errors
    ///
    /// Validation failures surface before any write; `DuplicateSku` when
    /// an explicit SKU is taken.
    pub async fn create(&self, input: ProductInput) -> Result<products::Model, ProductError> {
        validate_product(&ProductInputFields {
            name: &input.name,
            category: &input.category,
            cost_price: input.cost_price,
            selling_price: input.selling_price,
            stock_quantity: input.stock_quantity,
            min_stock: input.min_stock,
        })?;

        let sku = match &input.sku {
            Some(explicit) => {
                let taken = products::Entity::find()
                    .filter(products::Column::Sku.eq(explicit))
                    .one(&self.db)
                    .await?;
                if taken.is_some() {
                    return Err(ProductError::DuplicateSku(explicit.clone()));
                }
                explicit.clone()
            }
            None => self.generate_sku(&input.category, &input.name).await?,
        };

        let now: DateTime<FixedOffset> = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            sku: Set(sku),
            category: Set(input.category.trim().to_string()),
            cost_price: Set(round_money(input.cost_price)),
            selling_price: Set(round_money(input.selling_price)),
            stock_quantity: Set(input.stock_quantity),
            min_stock: Set(input.min_stock),
            period_id: Set(input.period_id),
            created_by: Set(input.created_by.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(sku = %product.sku, name = %product.name, "created product");
        Ok(product)
    }

    /// Generates a `CAT-NAM-001` style SKU free in the catalog.
    ///
    /// The candidate space for a prefix is fetched once so the counter
    /// search runs against an in-memory set.
    async fn generate_sku(&self, category: &str, name: &str) -> Result<String, ProductError> {
        let prefix = format!("{}-{}-", sku::abbreviate(category), sku::abbreviate(name));
        let existing: HashSet<String> = products::Entity::find()
            .filter(products::Column::Sku.starts_with(&prefix))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|product| product.sku)
            .collect();

        Ok(sku::generate_unique(category, name, Utc::now(), |candidate| {
            existing.contains(candidate)
        }))
    }

    /// Adds stock to the product matching on (name, category), refreshing
    /// its prices, threshold, and owning period; creates the product when
    /// no match exists.
    ///
    /// # Errors
    ///
    /// Same validation surface as [`Self::create`].
    pub async fn restock(&self, input: ProductInput) -> Result<RestockOutcome, ProductError> {
        validate_product(&ProductInputFields {
            name: &input.name,
            category: &input.category,
            cost_price: input.cost_price,
            selling_price: input.selling_price,
            stock_quantity: input.stock_quantity,
            min_stock: input.min_stock,
        })?;

        let existing = products::Entity::find()
            .filter(products::Column::Name.eq(input.name.trim()))
            .filter(products::Column::Category.eq(input.category.trim()))
            .one(&self.db)
            .await?;

        let Some(product) = existing else {
            return Ok(RestockOutcome::Created(self.create(input).await?));
        };

        let new_quantity = product.stock_quantity + input.stock_quantity;
        let sku = product.sku.clone();
        let mut active: products::ActiveModel = product.into();
        active.stock_quantity = Set(new_quantity);
        active.cost_price = Set(round_money(input.cost_price));
        active.selling_price = Set(round_money(input.selling_price));
        active.min_stock = Set(input.min_stock);
        if input.period_id.is_some() {
            active.period_id = Set(input.period_id);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await?;

        info!(%sku, added = input.stock_quantity, total = new_quantity, "restocked product");
        Ok(RestockOutcome::Restocked(updated))
    }

    /// Edits price/threshold details, guarded by the owning period's lock
    /// policy: locked periods reject regular callers and annotate
    /// privileged ones with an override warning (returned alongside the
    /// updated row).
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown product; `PeriodLocked` for a
    /// non-privileged edit against a locked period; validation errors when
    /// the resulting prices would sell below cost.
    pub async fn adjust_details(
        &self,
        product_id: Uuid,
        changes: ProductChanges,
        privileged: bool,
    ) -> Result<(products::Model, Option<String>), ProductError> {
        let product = products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(product_id))?;

        let mut warning = None;
        if let Some(period_id) = product.period_id {
            if let Some(period) = periods::Entity::find_by_id(period_id).one(&self.db).await? {
                let grant = authorize_mutation(&period.label, period.is_locked, privileged)?;
                warning = grant.warning().map(str::to_string);
            }
        }

        let cost_price = changes.cost_price.unwrap_or(product.cost_price);
        let selling_price = changes.selling_price.unwrap_or(product.selling_price);
        let min_stock = changes.min_stock.unwrap_or(product.min_stock);
        validate_product(&ProductInputFields {
            name: &product.name,
            category: &product.category,
            cost_price,
            selling_price,
            stock_quantity: product.stock_quantity,
            min_stock,
        })?;

        let sku = product.sku.clone();
        let mut active: products::ActiveModel = product.into();
        active.cost_price = Set(round_money(cost_price));
        active.selling_price = Set(round_money(selling_price));
        active.min_stock = Set(min_stock);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await?;

        if let Some(text) = &warning {
            warn!(%sku, warning = %text, "product edited under admin override");
        }
        Ok((updated, warning))
    }

    /// Finds a product by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if the product does not exist.
    pub async fn get(&self, product_id: Uuid) -> Result<products::Model, ProductError> {
        products::Entity::find_by_id(product_id)
            .one(&self.db)
            .await?
            .ok_or(ProductError::NotFound(product_id))
    }

    /// All products, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<products::Model>, ProductError> {
        let all = products::Entity::find()
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await?;
        Ok(all)
    }

    /// Products on hand but at or below their minimum-stock threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn low_stock(&self) -> Result<Vec<products::Model>, ProductError> {
        let all = self.list().await?;
        Ok(all
            .into_iter()
            .filter(|product| {
                classify_stock(product.stock_quantity, product.min_stock) == StockLevel::Low
            })
            .collect())
    }

    /// Products with no units on hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn out_of_stock(&self) -> Result<Vec<products::Model>, ProductError> {
        let all = self.list().await?;
        Ok(all
            .into_iter()
            .filter(|product| {
                classify_stock(product.stock_quantity, product.min_stock) == StockLevel::Out
            })
            .collect())
    }

    /// Catalog-wide counts and global stock valuation for external
    /// dashboards.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn catalog_summary(&self) -> Result<CatalogSummary, ProductError> {
        let all = self.list().await?;
        let stock_value = round_money(
            all.iter()
                .map(|product| Decimal::from(product.stock_quantity) * product.cost_price)
                .sum(),
        );
        let low_stock_count = all
            .iter()
            .filter(|product| {
                classify_stock(product.stock_quantity, product.min_stock) == StockLevel::Low
            })
            .count();
        let out_of_stock_count = all
            .iter()
            .filter(|product| {
                classify_stock(product.stock_quantity, product.min_stock) == StockLevel::Out
            })
            .count();

        Ok(CatalogSummary {
            product_count: all.len(),
            stock_value,
            low_stock_count,
            out_of_stock_count,
        })
    }
}
