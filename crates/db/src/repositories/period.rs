//! Period registry: the single source of truth for which accounting
//! period is active, whether a period is locked, and period boundary
//! dates.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::periods;

use super::ledger::{LedgerError, LedgerRepository};

/// Error types for period registry operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    /// A period already exists for the year/month.
    #[error("A period already exists for {year}-{month:02}")]
    AlreadyExists {
        /// Calendar year of the duplicate.
        year: i32,
        /// Calendar month of the duplicate.
        month: u32,
    },

    /// Month outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Period not found.
    #[error("Period not found: {0}")]
    NotFound(Uuid),

    /// Ledger bookkeeping failed during a roll.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PeriodError> for tillbook_shared::AppError {
    fn from(err: PeriodError) -> Self {
        let message = err.to_string();
        match err {
            PeriodError::AlreadyExists { .. } => Self::AlreadyExists(message),
            PeriodError::InvalidMonth(_) => Self::Validation(message),
            PeriodError::NotFound(_) => Self::NotFound(message),
            PeriodError::Ledger(inner) => inner.into(),
            PeriodError::Database(_) => Self::Database(message),
        }
    }
}

/// What `check_and_roll` did.
#[derive(Debug, Clone)]
pub enum RollOutcome {
    /// The active period still covers `now`; nothing changed.
    Unchanged(periods::Model),
    /// No period was active; the month containing `now` was started.
    Started(periods::Model),
    /// The active period had ended: it was locked and closed, and the
    /// month containing `now` was started.
    Rolled {
        /// The period that was locked and closed.
        locked: periods::Model,
        /// The newly active period.
        started: periods::Model,
    },
}

/// Period registry repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the unique active period, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_active(&self) -> Result<Option<periods::Model>, PeriodError> {
        let period = periods::Entity::find()
            .filter(periods::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;
        Ok(period)
    }

    /// Creates the period for a calendar month and makes it the active
    /// one, deactivating every other period.
    ///
    /// # Errors
    ///
    /// `InvalidMonth` outside 1..=12; `AlreadyExists` on a `(year, month)`
    /// duplicate.
    pub async fn create(
        &self,
        year: i32,
        month: u32,
        created_by: &str,
    ) -> Result<periods::Model, PeriodError> {
        let month_ref = tillbook_core::period::MonthRef::new(year, month)
            .ok_or(PeriodError::InvalidMonth(month))?;

        let duplicate = periods::Entity::find()
            .filter(periods::Column::Year.eq(year))
            .filter(periods::Column::Month.eq(month as i32))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(PeriodError::AlreadyExists { year, month });
        }

        let txn = self.db.begin().await?;
        let period = Self::insert_active(&txn, month_ref, created_by).await?;
        txn.commit().await?;

        info!(period = %period.label, "created and activated period");
        Ok(period)
    }

    /// Deactivates every period, then inserts the given month as active.
    async fn insert_active(
        txn: &DatabaseTransaction,
        month_ref: tillbook_core::period::MonthRef,
        created_by: &str,
    ) -> Result<periods::Model, PeriodError> {
        periods::Entity::update_many()
            .col_expr(periods::Column::IsActive, Expr::value(false))
            .filter(periods::Column::IsActive.eq(true))
            .exec(txn)
            .await?;

        let now: DateTime<FixedOffset> = Utc::now().into();
        let period = periods::ActiveModel {
            id: Set(Uuid::new_v4()),
            year: Set(month_ref.year),
            month: Set(month_ref.month as i32),
            label: Set(month_ref.label()),
            start_date: Set(month_ref.first_day()),
            end_date: Set(month_ref.last_day()),
            is_active: Set(true),
            is_locked: Set(false),
            locked_at: Set(None),
            created_by: Set(created_by.to_string()),
            created_at: Set(now),
        };
        Ok(period.insert(txn).await?)
    }

    /// Activates one period and deactivates every other.
    ///
    /// # Errors
    ///
    /// `NotFound` if the period does not exist.
    pub async fn activate_exclusive(&self, period_id: Uuid) -> Result<periods::Model, PeriodError> {
        let period = periods::Entity::find_by_id(period_id)
            .one(&self.db)
            .await?
            .ok_or(PeriodError::NotFound(period_id))?;

        let txn = self.db.begin().await?;
        periods::Entity::update_many()
            .col_expr(periods::Column::IsActive, Expr::value(false))
            .filter(periods::Column::IsActive.eq(true))
            .exec(&txn)
            .await?;

        let mut active: periods::ActiveModel = period.into();
        active.is_active = Set(true);
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(period = %updated.label, "activated period");
        Ok(updated)
    }

    /// Locks a period: `is_locked = true`, `locked_at = now`,
    /// `is_active = false`. Locking an already-locked period is a no-op
    /// returning the unchanged row.
    ///
    /// # Errors
    ///
    /// `NotFound` if the period does not exist.
    pub async fn lock(&self, period_id: Uuid) -> Result<periods::Model, PeriodError> {
        self.lock_at(period_id, Utc::now().into()).await
    }

    /// Locks a period with an explicit lock timestamp.
    ///
    /// # Errors
    ///
    /// `NotFound` if the period does not exist.
    pub async fn lock_at(
        &self,
        period_id: Uuid,
        now: DateTime<FixedOffset>,
    ) -> Result<periods::Model, PeriodError> {
        let period = periods::Entity::find_by_id(period_id)
            .one(&self.db)
            .await?
            .ok_or(PeriodError::NotFound(period_id))?;

        if period.is_locked {
            return Ok(period);
        }

        let label = period.label.clone();
        let mut active: periods::ActiveModel = period.into();
        active.is_locked = Set(true);
        active.locked_at = Set(Some(now));
        active.is_active = Set(false);
        let updated = active.update(&self.db).await?;

        info!(period = %label, "locked period");
        Ok(updated)
    }

    /// Rolls the period registry forward to the month containing `now`.
    ///
    /// - No active period: start the month containing `now`.
    /// - Active period still covers `now`: nothing happens.
    /// - Active period has ended: lock it, close its ledger entry, start
    ///   the month containing `now`, and materialize the new ledger entry
    ///   (which performs stock carry-forward).
    ///
    /// # Errors
    ///
    /// Propagates period and ledger errors; a month that already exists
    /// for the target date surfaces as `AlreadyExists`.
    pub async fn check_and_roll(
        &self,
        now: DateTime<FixedOffset>,
        created_by: &str,
    ) -> Result<RollOutcome, PeriodError> {
        let ledger = LedgerRepository::new(self.db.clone());
        let today = now.date_naive();
        let this_month = tillbook_core::period::MonthRef::of(today);

        let Some(active) = self.get_active().await? else {
            let started = self.create(this_month.year, this_month.month, created_by).await?;
            ledger.get_or_create_entry(&started).await?;
            info!(period = %started.label, "no active period, started current month");
            return Ok(RollOutcome::Started(started));
        };

        if active.end_date >= today {
            return Ok(RollOutcome::Unchanged(active));
        }

        let locked = self.lock_at(active.id, now).await?;
        ledger.close_entry(locked.id).await?;

        let started = self.create(this_month.year, this_month.month, created_by).await?;
        ledger.get_or_create_entry(&started).await?;

        info!(
            locked = %locked.label,
            started = %started.label,
            "rolled period forward"
        );
        Ok(RollOutcome::Rolled { locked, started })
    }

    /// The period whose date range contains `date`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_covering(
        &self,
        date: NaiveDate,
    ) -> Result<Option<periods::Model>, PeriodError> {
        let period = periods::Entity::find()
            .filter(periods::Column::StartDate.lte(date))
            .filter(periods::Column::EndDate.gte(date))
            .one(&self.db)
            .await?;
        Ok(period)
    }

    /// Finds a period by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if the period does not exist.
    pub async fn get(&self, period_id: Uuid) -> Result<periods::Model, PeriodError> {
        periods::Entity::find_by_id(period_id)
            .one(&self.db)
            .await?
            .ok_or(PeriodError::NotFound(period_id))
    }

    /// All periods in chronological `(year, month)` order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<periods::Model>, PeriodError> {
        let periods = periods::Entity::find()
            .order_by_asc(periods::Column::Year)
            .order_by_asc(periods::Column::Month)
            .all(&self.db)
            .await?;
        Ok(periods)
    }
}
