//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::UserProfile;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    /// Free-text label kept from the account record
    pub role: Option<String>,
    pub dob: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for UserProfile {
    fn from(model: Model) -> Self {
        UserProfile {
            username: model.username,
            email: model.email,
            role_label: model.role,
            dob: model.dob,
            created_at: model.created_at,
        }
    }
}
