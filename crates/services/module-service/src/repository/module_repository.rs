//! Module record storage.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::entities::module::{self, Entity as ModuleEntity};
use common::{AppError, AppResult};
use domain::ModuleRecord;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Module repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ModuleRepository: Send + Sync {
    async fn find(&self, name: &str) -> AppResult<Option<ModuleRecord>>;

    /// All modules ordered by name
    async fn list(&self) -> AppResult<Vec<ModuleRecord>>;

    /// Names of enabled modules, ordered
    async fn list_enabled(&self) -> AppResult<Vec<String>>;

    /// Insert a fresh record unless one exists. Returns whether it was inserted.
    async fn insert_if_absent(&self, name: &str, version: &str, enabled: bool) -> AppResult<bool>;

    /// Change the stored version. Returns false when nothing changed.
    async fn update_version(&self, name: &str, version: &str) -> AppResult<bool>;

    /// Administrator toggle. Returns false for unknown modules.
    async fn set_enabled(&self, name: &str, enabled: bool) -> AppResult<bool>;
}

/// Concrete implementation of ModuleRepository
pub struct ModuleStore {
    db: DatabaseConnection,
}

impl ModuleStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ModuleRepository for ModuleStore {
    async fn find(&self, name: &str) -> AppResult<Option<ModuleRecord>> {
        let result = ModuleEntity::find_by_id(name.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(ModuleRecord::from))
    }

    async fn list(&self) -> AppResult<Vec<ModuleRecord>> {
        let models = ModuleEntity::find()
            .order_by_asc(module::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(ModuleRecord::from).collect())
    }

    async fn list_enabled(&self) -> AppResult<Vec<String>> {
        let models = ModuleEntity::find()
            .filter(module::Column::Enabled.eq(true))
            .order_by_asc(module::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(|m| m.name).collect())
    }

    async fn insert_if_absent(&self, name: &str, version: &str, enabled: bool) -> AppResult<bool> {
        let now = Utc::now();
        let active_model = module::ActiveModel {
            name: Set(name.to_string()),
            version: Set(version.to_string()),
            enabled: Set(enabled),
            admin_toggled: Set(false),
            installed_at: Set(now),
            updated_at: Set(now),
        };

        let result = ModuleEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(module::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        Ok(storage::inserted(result)?)
    }

    async fn update_version(&self, name: &str, version: &str) -> AppResult<bool> {
        let result = ModuleEntity::update_many()
            .col_expr(module::Column::Version, Expr::value(version))
            .col_expr(module::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(module::Column::Name.eq(name))
            .filter(module::Column::Version.ne(version))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn set_enabled(&self, name: &str, enabled: bool) -> AppResult<bool> {
        let result = ModuleEntity::update_many()
            .col_expr(module::Column::Enabled, Expr::value(enabled))
            .col_expr(module::Column::AdminToggled, Expr::value(true))
            .col_expr(module::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(module::Column::Name.eq(name))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
