//! Migration: Create migration_records table.
//!
//! The composite primary key on (module, name) is what makes module
//! migrations run at most once, even with concurrent runners.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MigrationRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MigrationRecords::Module).string_len(64).not_null())
                    .col(ColumnDef::new(MigrationRecords::Name).string_len(190).not_null())
                    .col(
                        ColumnDef::new(MigrationRecords::AppliedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(MigrationRecords::Module)
                            .col(MigrationRecords::Name),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MigrationRecords::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MigrationRecords {
    Table,
    Module,
    Name,
    AppliedAt,
}
