//! Initial schema: periods, ledger entries, stock carry, products,
//! transactions, transaction items, receipts.
//!
//! Written with the schema DSL (not raw SQL) so it runs unchanged on
//! Postgres and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Periods::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Periods::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Periods::Year).integer().not_null())
                    .col(ColumnDef::new(Periods::Month).integer().not_null())
                    .col(ColumnDef::new(Periods::Label).string().not_null())
                    .col(ColumnDef::new(Periods::StartDate).date().not_null())
                    .col(ColumnDef::new(Periods::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Periods::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Periods::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Periods::LockedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Periods::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Periods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PeriodLedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::PeriodId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::OpeningBalance)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::CurrentInventory)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::ClosingBalance)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::TotalSales)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::TotalProfit)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodLedgerEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_entries_period")
                            .from(PeriodLedgerEntries::Table, PeriodLedgerEntries::PeriodId)
                            .to(Periods::Table, Periods::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(
                        ColumnDef::new(Products::Sku)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Products::Category).string().not_null())
                    .col(
                        ColumnDef::new(Products::CostPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::SellingPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::StockQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Products::MinStock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Products::PeriodId).uuid())
                    .col(ColumnDef::new(Products::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_period")
                            .from(Products::Table, Products::PeriodId)
                            .to(Periods::Table, Periods::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PeriodStockCarry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PeriodStockCarry::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PeriodStockCarry::FromPeriodId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodStockCarry::ToPeriodId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodStockCarry::ProductId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodStockCarry::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodStockCarry::UnitCost)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodStockCarry::CarriedValue)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PeriodStockCarry::CarriedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_carry_from_period")
                            .from(PeriodStockCarry::Table, PeriodStockCarry::FromPeriodId)
                            .to(Periods::Table, Periods::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_carry_to_period")
                            .from(PeriodStockCarry::Table, PeriodStockCarry::ToPeriodId)
                            .to(Periods::Table, Periods::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_carry_product")
                            .from(PeriodStockCarry::Table, PeriodStockCarry::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ReceiptNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TotalAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::DiscountAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::NetAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::PaymentMethod)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::PeriodId).uuid())
                    .col(ColumnDef::new(Transactions::RecordedBy).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_period")
                            .from(Transactions::Table, Transactions::PeriodId)
                            .to(Periods::Table, Periods::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::TransactionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::ProductId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::Quantity)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::UnitPrice)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransactionItems::LineTotal)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_transaction")
                            .from(TransactionItems::Table, TransactionItems::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_product")
                            .from(TransactionItems::Table, TransactionItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Receipts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Receipts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Receipts::TransactionId).uuid().not_null())
                    .col(
                        ColumnDef::new(Receipts::ReceiptNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Receipts::CustomerName).string())
                    .col(ColumnDef::new(Receipts::CustomerPhone).string())
                    .col(ColumnDef::new(Receipts::CustomerEmail).string())
                    .col(ColumnDef::new(Receipts::SellerName).string().not_null())
                    .col(
                        ColumnDef::new(Receipts::TotalAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Receipts::DiscountAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Receipts::NetAmount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Receipts::PaymentMethod)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Receipts::TransactionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Receipts::ItemsJson).json().not_null())
                    .col(ColumnDef::new(Receipts::RenderedText).text().not_null())
                    .col(ColumnDef::new(Receipts::CompanyJson).json().not_null())
                    .col(ColumnDef::new(Receipts::PeriodId).uuid())
                    .col(
                        ColumnDef::new(Receipts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_receipts_transaction")
                            .from(Receipts::Table, Receipts::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Receipts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TransactionItems::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Transactions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PeriodStockCarry::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PeriodLedgerEntries::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Periods::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Periods {
    Table,
    Id,
    Year,
    Month,
    Label,
    StartDate,
    EndDate,
    IsActive,
    IsLocked,
    LockedAt,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PeriodLedgerEntries {
    Table,
    Id,
    PeriodId,
    OpeningBalance,
    CurrentInventory,
    ClosingBalance,
    TotalSales,
    TotalProfit,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PeriodStockCarry {
    Table,
    Id,
    FromPeriodId,
    ToPeriodId,
    ProductId,
    Quantity,
    UnitCost,
    CarriedValue,
    CarriedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Sku,
    Category,
    CostPrice,
    SellingPrice,
    StockQuantity,
    MinStock,
    PeriodId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    ReceiptNumber,
    TotalAmount,
    DiscountAmount,
    NetAmount,
    PaymentMethod,
    TransactionDate,
    PeriodId,
    RecordedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TransactionItems {
    Table,
    Id,
    TransactionId,
    ProductId,
    Quantity,
    UnitPrice,
    LineTotal,
}

#[derive(DeriveIden)]
enum Receipts {
    Table,
    Id,
    TransactionId,
    ReceiptNumber,
    CustomerName,
    CustomerPhone,
    CustomerEmail,
    SellerName,
    TotalAmount,
    DiscountAmount,
    NetAmount,
    PaymentMethod,
    TransactionDate,
    ItemsJson,
    RenderedText,
    CompanyJson,
    PeriodId,
    CreatedAt,
}
