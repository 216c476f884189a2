//! identity: KYC columns on `users`.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use sea_orm_migration::SchemaManager;

use common::AppResult;

use super::ModuleMigration;

pub struct UsersKyc;

#[async_trait]
impl ModuleMigration for UsersKyc {
    fn name(&self) -> &str {
        "001_users_kyc"
    }

    async fn apply(&self, db: &DatabaseConnection) -> AppResult<()> {
        let manager = SchemaManager::new(db);

        let columns = [
            ColumnDef::new(Users::KycStatus)
                .string_len(32)
                .not_null()
                .default("pending")
                .to_owned(),
            ColumnDef::new(Users::KycProvider).string_len(64).null().to_owned(),
            ColumnDef::new(Users::KycRef).string_len(190).null().to_owned(),
            ColumnDef::new(Users::Country).string_len(2).null().to_owned(),
            ColumnDef::new(Users::DocType).string_len(32).null().to_owned(),
        ];

        for column in columns {
            let name = column.get_column_name();
            if manager.has_column("users", &name).await? {
                continue;
            }
            // SQLite only takes one column per ALTER TABLE
            manager
                .alter_table(
                    Table::alter()
                        .table(Users::Table)
                        .add_column(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_users_kyc_status")
                    .table(Users::Table)
                    .col(Users::KycStatus)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_provider_ref")
                    .table(Users::Table)
                    .col(Users::KycProvider)
                    .col(Users::KycRef)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    KycStatus,
    KycProvider,
    KycRef,
    Country,
    DocType,
}
