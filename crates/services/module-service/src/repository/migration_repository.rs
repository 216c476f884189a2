//! Migration record storage.
//!
//! A record is written *before* a migration runs (the claim). The primary
//! key on (module, name) guarantees only one runner wins it.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::entities::migration_record::{self, Entity as MigrationRecordEntity};
use common::{AppError, AppResult};
use domain::MigrationRecord;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Migration repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MigrationRepository: Send + Sync {
    async fn is_applied(&self, module: &str, name: &str) -> AppResult<bool>;

    /// Conditionally insert the record. `false` means someone else holds it.
    async fn claim(&self, module: &str, name: &str) -> AppResult<bool>;

    /// Refresh `applied_at` after a successful run
    async fn touch(&self, module: &str, name: &str) -> AppResult<()>;

    /// Drop a claim whose migration failed
    async fn release(&self, module: &str, name: &str) -> AppResult<()>;

    /// Records of one module ordered by name
    async fn list_for(&self, module: &str) -> AppResult<Vec<MigrationRecord>>;
}

/// Concrete implementation of MigrationRepository
pub struct MigrationStore {
    db: DatabaseConnection,
}

impl MigrationStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MigrationRepository for MigrationStore {
    async fn is_applied(&self, module: &str, name: &str) -> AppResult<bool> {
        let found = MigrationRecordEntity::find_by_id((module.to_string(), name.to_string()))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(found.is_some())
    }

    async fn claim(&self, module: &str, name: &str) -> AppResult<bool> {
        let active_model = migration_record::ActiveModel {
            module: Set(module.to_string()),
            name: Set(name.to_string()),
            applied_at: Set(Utc::now()),
        };

        let result = MigrationRecordEntity::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    migration_record::Column::Module,
                    migration_record::Column::Name,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        Ok(storage::inserted(result)?)
    }

    async fn touch(&self, module: &str, name: &str) -> AppResult<()> {
        MigrationRecordEntity::update_many()
            .col_expr(migration_record::Column::AppliedAt, Expr::value(Utc::now()))
            .filter(migration_record::Column::Module.eq(module))
            .filter(migration_record::Column::Name.eq(name))
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn release(&self, module: &str, name: &str) -> AppResult<()> {
        MigrationRecordEntity::delete_many()
            .filter(migration_record::Column::Module.eq(module))
            .filter(migration_record::Column::Name.eq(name))
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn list_for(&self, module: &str) -> AppResult<Vec<MigrationRecord>> {
        let models = MigrationRecordEntity::find()
            .filter(migration_record::Column::Module.eq(module))
            .order_by_asc(migration_record::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(MigrationRecord::from).collect())
    }
}
