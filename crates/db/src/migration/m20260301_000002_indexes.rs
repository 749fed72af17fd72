//! Lookup indexes for the hot query paths: period resolution by calendar
//! month, per-period sale listings, and carry-forward chain walks.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_periods_year_month")
                    .table(Periods::Table)
                    .col(Periods::Year)
                    .col(Periods::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_period")
                    .table(Transactions::Table)
                    .col(Transactions::PeriodId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transaction_items_transaction")
                    .table(TransactionItems::Table)
                    .col(TransactionItems::TransactionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stock_carry_to_period")
                    .table(PeriodStockCarry::Table)
                    .col(PeriodStockCarry::ToPeriodId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .col(Products::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_stock_carry_to_period")
                    .table(PeriodStockCarry::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transaction_items_transaction")
                    .table(TransactionItems::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_transactions_period")
                    .table(Transactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_periods_year_month")
                    .table(Periods::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Periods {
    Table,
    Year,
    Month,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    PeriodId,
}

#[derive(DeriveIden)]
enum TransactionItems {
    Table,
    TransactionId,
}

#[derive(DeriveIden)]
enum PeriodStockCarry {
    Table,
    ToPeriodId,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Category,
}
