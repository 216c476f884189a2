//! Page database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Page, PageStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub title: String,
    pub status: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub template: Option<String>,
    pub override_path: Option<String>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity. Unknown statuses read as draft.
impl From<Model> for Page {
    fn from(model: Model) -> Self {
        Page {
            id: model.id,
            slug: model.slug,
            title: model.title,
            status: model.status.parse().unwrap_or(PageStatus::Draft),
            content: model.content,
            template: model.template,
            override_path: model.override_path,
            updated_at: model.updated_at,
        }
    }
}
