//! Applied module migration. (module, name) is the primary key.

use sea_orm::entity::prelude::*;

use domain::MigrationRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "migration_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub module: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub applied_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MigrationRecord {
    fn from(model: Model) -> Self {
        MigrationRecord {
            module: model.module,
            name: model.name,
            applied_at: model.applied_at,
        }
    }
}
