//! Page storage.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use super::entities::page::{self, ActiveModel, Entity as PageEntity};
use common::{AppError, AppResult};
use domain::{NewPage, Page};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Page repository trait for dependency injection.
///
/// Input is expected to be normalized already.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn find(&self, id: i32) -> AppResult<Option<Page>>;

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Page>>;

    /// All pages ordered by slug
    async fn list(&self) -> AppResult<Vec<Page>>;

    async fn insert(&self, page: NewPage) -> AppResult<Page>;

    /// Insert unless the slug is taken. Returns whether it was inserted.
    async fn insert_if_absent(&self, page: NewPage) -> AppResult<bool>;

    /// Overwrite a page. `None` when the id is unknown.
    async fn update(&self, id: i32, page: NewPage) -> AppResult<Option<Page>>;

    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Concrete implementation of PageRepository
pub struct PageStore {
    db: DatabaseConnection,
}

impl PageStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn new_active_model(page: NewPage) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        slug: Set(page.slug),
        title: Set(page.title),
        status: Set(page.status.as_str().to_string()),
        content: Set(page.content),
        template: Set(page.template),
        override_path: Set(page.override_path),
        updated_at: Set(Utc::now()),
    }
}

#[async_trait]
impl PageRepository for PageStore {
    async fn find(&self, id: i32) -> AppResult<Option<Page>> {
        let result = PageEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Page::from))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Page>> {
        let result = PageEntity::find()
            .filter(page::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Page::from))
    }

    async fn list(&self) -> AppResult<Vec<Page>> {
        let models = PageEntity::find()
            .order_by_asc(page::Column::Slug)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Page::from).collect())
    }

    async fn insert(&self, page: NewPage) -> AppResult<Page> {
        let model = new_active_model(page)
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Page::from(model))
    }

    async fn insert_if_absent(&self, page: NewPage) -> AppResult<bool> {
        let result = PageEntity::insert(new_active_model(page))
            .on_conflict(
                OnConflict::column(page::Column::Slug)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        Ok(storage::inserted(result)?)
    }

    async fn update(&self, id: i32, page: NewPage) -> AppResult<Option<Page>> {
        let Some(existing) = PageEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.slug = Set(page.slug);
        active.title = Set(page.title);
        active.status = Set(page.status.as_str().to_string());
        active.content = Set(page.content);
        active.template = Set(page.template);
        active.override_path = Set(page.override_path);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Some(Page::from(model)))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = PageEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
