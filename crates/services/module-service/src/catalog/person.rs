//! person: profile table keyed by username.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use sea_orm_migration::SchemaManager;

use common::AppResult;

use super::ModuleMigration;

pub struct PersonProfile;

#[async_trait]
impl ModuleMigration for PersonProfile {
    fn name(&self) -> &str {
        "001_person_profile"
    }

    async fn apply(&self, db: &DatabaseConnection) -> AppResult<()> {
        SchemaManager::new(db)
            .create_table(
                Table::create()
                    .table(PersonProfileTable::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PersonProfileTable::Username)
                            .string_len(190)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PersonProfileTable::Realname).string_len(190).null())
                    .col(ColumnDef::new(PersonProfileTable::Dob).date().null())
                    .col(ColumnDef::new(PersonProfileTable::Street).string_len(190).null())
                    .col(ColumnDef::new(PersonProfileTable::Zip).string_len(32).null())
                    .col(ColumnDef::new(PersonProfileTable::City).string_len(190).null())
                    .col(ColumnDef::new(PersonProfileTable::Country).string_len(2).null())
                    .col(
                        ColumnDef::new(PersonProfileTable::CreatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PersonProfileTable::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
#[iden = "person_profile"]
enum PersonProfileTable {
    Table,
    Username,
    Realname,
    Dob,
    Street,
    Zip,
    City,
    Country,
    CreatedAt,
    UpdatedAt,
}
