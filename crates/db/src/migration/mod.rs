//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. The schema is written
//! with the portable DSL so the same migrations run on Postgres in
//! deployment and on SQLite in the integration suite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_tables;
mod m20260301_000002_indexes;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_tables::Migration),
            Box::new(m20260301_000002_indexes::Migration),
        ]
    }
}
