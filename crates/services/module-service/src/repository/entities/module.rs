//! Module database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::ModuleRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "modules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub version: String,
    pub enabled: bool,
    /// Set once an administrator changed `enabled` explicitly
    pub admin_toggled: bool,
    pub installed_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ModuleRecord {
    fn from(model: Model) -> Self {
        ModuleRecord {
            name: model.name,
            version: model.version,
            enabled: model.enabled,
            admin_toggled: model.admin_toggled,
            installed_at: model.installed_at,
            updated_at: model.updated_at,
        }
    }
}
