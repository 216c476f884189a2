//! Read-only user lookups.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use super::entities::user::{self, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::UserProfile;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User lookups by username. Matching is case-insensitive.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by username
    async fn find(&self, username: &str) -> AppResult<Option<UserProfile>>;

    /// List all users ordered by username
    async fn list(&self) -> AppResult<Vec<UserProfile>>;
}

/// Concrete implementation of UserDirectory
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for UserStore {
    async fn find(&self, username: &str) -> AppResult<Option<UserProfile>> {
        let username = username.trim().to_lowercase();
        if username.is_empty() {
            return Ok(None);
        }

        let result = UserEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(user::Column::Username))).eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(UserProfile::from))
    }

    async fn list(&self) -> AppResult<Vec<UserProfile>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(UserProfile::from).collect())
    }
}
