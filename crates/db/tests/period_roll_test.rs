//! Integration tests for the period registry: exclusive activation, lock
//! semantics, and rolling the registry forward across month boundaries.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use tillbook_db::migration::{Migrator, MigratorTrait};
use tillbook_db::repositories::ledger::LedgerRepository;
use tillbook_db::repositories::period::{PeriodError, PeriodRepository, RollOutcome};

async fn setup() -> DatabaseConnection {
    // A single pooled connection keeps the shared in-memory database
    // alive for the whole test.
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

fn noon(year: i32, month: u32, day: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn test_create_activates_exclusively() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    let march = repo.create(2025, 3, "admin").await.unwrap();
    assert!(march.is_active);
    assert_eq!(march.label, "March 2025");
    assert_eq!(march.start_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    assert_eq!(march.end_date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());

    let april = repo.create(2025, 4, "admin").await.unwrap();
    assert!(april.is_active);

    // Creating April deactivated March.
    let march = repo.get(march.id).await.unwrap();
    assert!(!march.is_active);
    assert_eq!(repo.get_active().await.unwrap().unwrap().id, april.id);
}

#[tokio::test]
async fn test_create_rejects_duplicate_month() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    repo.create(2025, 3, "admin").await.unwrap();
    let result = repo.create(2025, 3, "admin").await;
    assert!(matches!(
        result,
        Err(PeriodError::AlreadyExists { year: 2025, month: 3 })
    ));
}

#[tokio::test]
async fn test_create_rejects_invalid_month() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    assert!(matches!(
        repo.create(2025, 13, "admin").await,
        Err(PeriodError::InvalidMonth(13))
    ));
    assert!(matches!(
        repo.create(2025, 0, "admin").await,
        Err(PeriodError::InvalidMonth(0))
    ));
}

#[tokio::test]
async fn test_lock_is_terminal_and_idempotent() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    let march = repo.create(2025, 3, "admin").await.unwrap();
    let locked = repo.lock(march.id).await.unwrap();
    assert!(locked.is_locked);
    assert!(!locked.is_active);
    assert!(locked.locked_at.is_some());

    // Locking again is a no-op: the original lock timestamp survives.
    let again = repo.lock(march.id).await.unwrap();
    assert_eq!(again.locked_at, locked.locked_at);
    assert!(again.is_locked);
}

#[tokio::test]
async fn test_check_and_roll_starts_first_period() {
    let db = setup().await;
    let repo = PeriodRepository::new(db.clone());
    let ledger = LedgerRepository::new(db);

    let outcome = repo.check_and_roll(noon(2025, 3, 15), "admin").await.unwrap();
    let RollOutcome::Started(started) = outcome else {
        panic!("expected Started, got {outcome:?}");
    };
    assert_eq!(started.label, "March 2025");
    assert!(started.is_active);

    // The new period's ledger entry was materialized immediately.
    let entry = ledger.get_entry(started.id).await.unwrap().unwrap();
    assert_eq!(entry.period_id, started.id);
}

#[tokio::test]
async fn test_check_and_roll_is_unchanged_within_the_month() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    let march = repo.create(2025, 3, "admin").await.unwrap();
    let outcome = repo.check_and_roll(noon(2025, 3, 31), "admin").await.unwrap();
    let RollOutcome::Unchanged(active) = outcome else {
        panic!("expected Unchanged, got {outcome:?}");
    };
    assert_eq!(active.id, march.id);
}

#[tokio::test]
async fn test_check_and_roll_locks_closes_and_starts_next_month() {
    let db = setup().await;
    let repo = PeriodRepository::new(db.clone());
    let ledger = LedgerRepository::new(db);

    let march = repo.create(2025, 3, "admin").await.unwrap();
    ledger.get_or_create_entry(&march).await.unwrap();

    let outcome = repo.check_and_roll(noon(2025, 4, 2), "admin").await.unwrap();
    let RollOutcome::Rolled { locked, started } = outcome else {
        panic!("expected Rolled, got {outcome:?}");
    };

    assert_eq!(locked.id, march.id);
    assert!(locked.is_locked);
    assert!(!locked.is_active);

    assert_eq!(started.label, "April 2025");
    assert!(started.is_active);

    // The closed entry's closing balance became the new entry's opening.
    let closed = ledger.get_entry(march.id).await.unwrap().unwrap();
    let opened = ledger.get_entry(started.id).await.unwrap().unwrap();
    assert_eq!(opened.opening_balance, closed.closing_balance);
}

#[tokio::test]
async fn test_check_and_roll_skips_over_a_gap() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    repo.create(2025, 3, "admin").await.unwrap();

    // Nobody touched the system during April and May.
    let outcome = repo.check_and_roll(noon(2025, 6, 5), "admin").await.unwrap();
    let RollOutcome::Rolled { locked, started } = outcome else {
        panic!("expected Rolled, got {outcome:?}");
    };
    assert_eq!(locked.label, "March 2025");
    assert_eq!(started.label, "June 2025");
}

#[tokio::test]
async fn test_activate_exclusive_deactivates_the_rest() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    let march = repo.create(2025, 3, "admin").await.unwrap();
    let april = repo.create(2025, 4, "admin").await.unwrap();

    let reactivated = repo.activate_exclusive(march.id).await.unwrap();
    assert!(reactivated.is_active);
    assert!(!repo.get(april.id).await.unwrap().is_active);
}

#[tokio::test]
async fn test_find_covering_resolves_by_date() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    let march = repo.create(2025, 3, "admin").await.unwrap();
    repo.create(2025, 4, "admin").await.unwrap();

    let covering = repo
        .find_covering(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(covering.id, march.id);

    let none = repo
        .find_covering(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn test_list_is_chronological() {
    let db = setup().await;
    let repo = PeriodRepository::new(db);

    repo.create(2025, 4, "admin").await.unwrap();
    repo.create(2024, 12, "admin").await.unwrap();
    repo.create(2025, 3, "admin").await.unwrap();

    let labels: Vec<String> = repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|period| period.label)
        .collect();
    assert_eq!(labels, vec!["December 2024", "March 2025", "April 2025"]);
}
