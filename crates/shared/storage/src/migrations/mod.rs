//! Core schema migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}
//!
//! Module-owned schema changes are not listed here; they run through the
//! module migration tracker.

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_roles_tables;
mod m20240101_000003_create_modules_table;
mod m20240101_000004_create_migration_records_table;
mod m20240101_000005_create_pages_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_roles_tables::Migration),
            Box::new(m20240101_000003_create_modules_table::Migration),
            Box::new(m20240101_000004_create_migration_records_table::Migration),
            Box::new(m20240101_000005_create_pages_table::Migration),
        ]
    }
}
