//! Role and grant storage.
//!
//! Every write is a keyed insert-or-ignore or a keyed delete, so repeating an
//! operation is harmless. Callers pass names already normalized.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};

use super::entities::{role, role_capability, user_role};
use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role repository trait for dependency injection.
///
/// Write methods return `true` when a row was actually added or removed.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn role_exists(&self, name: &str) -> AppResult<bool>;

    /// Insert the role unless it already exists
    async fn create_role(&self, name: &str) -> AppResult<bool>;

    /// Remove the role and its capability grants atomically.
    /// Fails with `Conflict("role in use")` while any user holds the role.
    async fn delete_role(&self, name: &str) -> AppResult<bool>;

    /// All role names, sorted
    async fn list_roles(&self) -> AppResult<Vec<String>>;

    /// Roles assigned to a user, sorted
    async fn roles_of(&self, username: &str) -> AppResult<Vec<String>>;

    /// Users holding a role, sorted
    async fn users_with_role(&self, role: &str) -> AppResult<Vec<String>>;

    async fn count_users_with_role(&self, role: &str) -> AppResult<u64>;

    async fn assign(&self, username: &str, role: &str) -> AppResult<bool>;

    async fn unassign(&self, username: &str, role: &str) -> AppResult<bool>;

    /// Capabilities granted to a role, sorted
    async fn capabilities_of(&self, role: &str) -> AppResult<Vec<String>>;

    async fn grant_capability(&self, role: &str, capability: &str) -> AppResult<bool>;

    async fn revoke_capability(&self, role: &str, capability: &str) -> AppResult<bool>;

    /// Whether any of `roles` carries a grant for `capability`
    async fn any_role_has_capability(&self, roles: &[String], capability: &str) -> AppResult<bool>;
}

const ROLE_IN_USE: &str = "role in use";

fn in_use_on_fk_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::conflict(ROLE_IN_USE),
        _ => AppError::from(err),
    }
}

/// Concrete implementation of RoleRepository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn role_exists(&self, name: &str) -> AppResult<bool> {
        let found = role::Entity::find_by_id(name.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(found.is_some())
    }

    async fn create_role(&self, name: &str) -> AppResult<bool> {
        let active_model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(role::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        Ok(storage::inserted(result)?)
    }

    async fn delete_role(&self, name: &str) -> AppResult<bool> {
        let txn = self.db.begin().await?;

        let holders = user_role::Entity::find()
            .filter(user_role::Column::Role.eq(name))
            .count(&txn)
            .await?;
        if holders > 0 {
            return Err(AppError::conflict(ROLE_IN_USE));
        }

        role_capability::Entity::delete_many()
            .filter(role_capability::Column::Role.eq(name))
            .exec(&txn)
            .await?;

        // A grant committed after the count still trips the foreign key
        let result = role::Entity::delete_by_id(name.to_string())
            .exec(&txn)
            .await
            .map_err(in_use_on_fk_violation)?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_roles(&self) -> AppResult<Vec<String>> {
        let models = role::Entity::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(|m| m.name).collect())
    }

    async fn roles_of(&self, username: &str) -> AppResult<Vec<String>> {
        let models = user_role::Entity::find()
            .filter(user_role::Column::Username.eq(username))
            .order_by_asc(user_role::Column::Role)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(|m| m.role).collect())
    }

    async fn users_with_role(&self, role: &str) -> AppResult<Vec<String>> {
        let models = user_role::Entity::find()
            .filter(user_role::Column::Role.eq(role))
            .order_by_asc(user_role::Column::Username)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(|m| m.username).collect())
    }

    async fn count_users_with_role(&self, role: &str) -> AppResult<u64> {
        let count = user_role::Entity::find()
            .filter(user_role::Column::Role.eq(role))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn assign(&self, username: &str, role: &str) -> AppResult<bool> {
        let active_model = user_role::ActiveModel {
            username: Set(username.to_string()),
            role: Set(role.to_string()),
        };

        let result = user_role::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([user_role::Column::Username, user_role::Column::Role])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        Ok(storage::inserted(result)?)
    }

    async fn unassign(&self, username: &str, role: &str) -> AppResult<bool> {
        let result = user_role::Entity::delete_many()
            .filter(user_role::Column::Username.eq(username))
            .filter(user_role::Column::Role.eq(role))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn capabilities_of(&self, role: &str) -> AppResult<Vec<String>> {
        let models = role_capability::Entity::find()
            .filter(role_capability::Column::Role.eq(role))
            .order_by_asc(role_capability::Column::Capability)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(|m| m.capability).collect())
    }

    async fn grant_capability(&self, role: &str, capability: &str) -> AppResult<bool> {
        let active_model = role_capability::ActiveModel {
            role: Set(role.to_string()),
            capability: Set(capability.to_string()),
        };

        let result = role_capability::Entity::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    role_capability::Column::Role,
                    role_capability::Column::Capability,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        Ok(storage::inserted(result)?)
    }

    async fn revoke_capability(&self, role: &str, capability: &str) -> AppResult<bool> {
        let result = role_capability::Entity::delete_many()
            .filter(role_capability::Column::Role.eq(role))
            .filter(role_capability::Column::Capability.eq(capability))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn any_role_has_capability(&self, roles: &[String], capability: &str) -> AppResult<bool> {
        if roles.is_empty() {
            return Ok(false);
        }

        let count = role_capability::Entity::find()
            .filter(role_capability::Column::Role.is_in(roles.iter().cloned()))
            .filter(role_capability::Column::Capability.eq(capability))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
