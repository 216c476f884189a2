//! Migration: Create roles, role_capabilities and user_roles.
//!
//! Both grant tables are keyed on their pair, which makes grants set-valued.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Name)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoleCapabilities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoleCapabilities::Role).string_len(64).not_null())
                    .col(
                        ColumnDef::new(RoleCapabilities::Capability)
                            .string_len(64)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RoleCapabilities::Role)
                            .col(RoleCapabilities::Capability),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_capabilities_role")
                            .from(RoleCapabilities::Table, RoleCapabilities::Role)
                            .to(Roles::Table, Roles::Name),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRoles::Username).string_len(190).not_null())
                    .col(ColumnDef::new(UserRoles::Role).string_len(64).not_null())
                    .primary_key(Index::create().col(UserRoles::Username).col(UserRoles::Role))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_role")
                            .from(UserRoles::Table, UserRoles::Role)
                            .to(Roles::Table, Roles::Name),
                    )
                    .to_owned(),
            )
            .await?;

        // "Is this role in use?" looks up by role alone
        manager
            .create_index(
                Index::create()
                    .name("idx_user_roles_role")
                    .table(UserRoles::Table)
                    .col(UserRoles::Role)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoleCapabilities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Roles {
    Table,
    Name,
}

#[derive(Iden)]
enum RoleCapabilities {
    Table,
    Role,
    Capability,
}

#[derive(Iden)]
enum UserRoles {
    Table,
    Username,
    Role,
}
