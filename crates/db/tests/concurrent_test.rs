//! Concurrent checkout tests: two tills selling the same product at the
//! same moment must never oversell it.
//!
//! The guarded decrement only matches while stock is still sufficient, so
//! whichever commit lands second sees the already-reduced quantity and the
//! losing sale rolls back in full.

use chrono::{Datelike, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
};
use std::sync::Arc;
use tokio::sync::Barrier;

use tillbook_core::checkout::{self, Cart};
use tillbook_db::entities::{products, sea_orm_active_enums::PaymentMethod, transactions};
use tillbook_db::migration::{Migrator, MigratorTrait};
use tillbook_db::repositories::period::PeriodRepository;
use tillbook_db::repositories::product::{ProductInput, ProductRepository};
use tillbook_db::repositories::sale::{CommitContext, SaleError, SaleRepository};
use tillbook_shared::CompanyDetails;

async fn setup() -> DatabaseConnection {
    // A single pooled connection keeps the shared in-memory database
    // alive and serializes the commit transactions, as a single Postgres
    // row lock would in deployment.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

async fn seed(db: &DatabaseConnection, stock: i32) -> products::Model {
    let today = Utc::now().date_naive();
    let period = PeriodRepository::new(db.clone())
        .create(today.year(), today.month(), "admin")
        .await
        .expect("Failed to create period");

    ProductRepository::new(db.clone())
        .create(ProductInput {
            name: "Maize Flour 2kg".to_string(),
            category: "Food".to_string(),
            sku: None,
            cost_price: dec!(100.00),
            selling_price: dec!(150.00),
            stock_quantity: stock,
            min_stock: 2,
            period_id: Some(period.id),
            created_by: "admin".to_string(),
        })
        .await
        .expect("Failed to seed product")
}

fn ctx(seller: &str) -> CommitContext {
    CommitContext {
        recorded_by: seller.to_string(),
        privileged: false,
        now: Utc::now().into(),
        payment_method: PaymentMethod::Cash,
        customer: None,
        company: CompanyDetails::default(),
    }
}

/// Builds a previewed cart of `quantity` units with a caller-chosen
/// receipt number, so the two tills cannot collide on numbering.
async fn previewed_cart(
    sales: &SaleRepository,
    product_id: uuid::Uuid,
    quantity: i32,
    suffix: u32,
) -> (Cart, checkout::SalePreview) {
    let mut cart = Cart::new();
    sales.add_line(&mut cart, product_id, quantity).await.unwrap();
    let number = format!("RCP{}{suffix:03}", Utc::now().date_naive().format("%Y%m%d"));
    let preview = checkout::preview(&cart, Decimal::ZERO, number).unwrap();
    (cart, preview)
}

#[tokio::test]
async fn test_concurrent_commits_never_oversell() {
    let db = setup().await;
    let product = seed(&db, 5).await;

    // Both tills previewed 3 units while 5 were on hand; only one commit
    // can fit.
    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for (seller, suffix) in [("amina", 101), ("joseph", 102)] {
        let sales = SaleRepository::new(db.clone());
        let (mut cart, preview) = previewed_cart(&sales, product.id, 3, suffix).await;
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            sales.commit(&mut cart, &preview, ctx(seller)).await
        }));
    }

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let wins = results.iter().filter(|result| result.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|result| matches!(result, Err(SaleError::StockConflict { .. })))
        .count();
    assert_eq!(wins, 1);
    assert_eq!(conflicts, 1);

    // 5 on hand, one sale of 3 landed.
    let product = products::Entity::find_by_id(product.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock_quantity, 2);
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_commits_that_both_fit_both_land() {
    let db = setup().await;
    let product = seed(&db, 10).await;

    let barrier = Arc::new(Barrier::new(2));
    let mut handles = Vec::new();
    for (seller, suffix) in [("amina", 201), ("joseph", 202)] {
        let sales = SaleRepository::new(db.clone());
        let (mut cart, preview) = previewed_cart(&sales, product.id, 3, suffix).await;
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            sales.commit(&mut cart, &preview, ctx(seller)).await
        }));
    }

    for joined in join_all(handles).await {
        joined.expect("task panicked").expect("commit failed");
    }

    let product = products::Entity::find_by_id(product.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.stock_quantity, 4);
    assert_eq!(transactions::Entity::find().count(&db).await.unwrap(), 2);
}
