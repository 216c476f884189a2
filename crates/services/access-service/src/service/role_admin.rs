//! Role and capability administration.
//!
//! Callers are trusted: authorization happens before these methods are
//! reached.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use common::{AppError, AppResult};
use domain::{
    is_super_role, normalize_capability, normalize_role_name, normalize_username, RoleSummary,
    DEFAULT_ROLE_GRANTS,
};

use crate::repository::RoleRepository;

/// Role administration trait for dependency injection.
#[async_trait]
pub trait RoleAdministration: Send + Sync {
    /// Create a role; creating an existing role succeeds. Returns the stored name.
    async fn create_role(&self, name: &str) -> AppResult<String>;

    /// Delete an unused role and its grants. Unknown roles are a no-op.
    async fn delete_role(&self, name: &str) -> AppResult<()>;

    /// Assign an existing role to a user
    async fn grant_role(&self, user: &str, role: &str) -> AppResult<()>;

    async fn revoke_role(&self, user: &str, role: &str) -> AppResult<()>;

    /// Grant a capability to an existing role
    async fn add_capability(&self, role: &str, capability: &str) -> AppResult<()>;

    async fn remove_capability(&self, role: &str, capability: &str) -> AppResult<()>;

    /// Every role with its capabilities and users, sorted by name
    async fn list_roles(&self) -> AppResult<Vec<RoleSummary>>;

    async fn capabilities_of(&self, role: &str) -> AppResult<Vec<String>>;

    /// Create the default roles and grants. Safe to run repeatedly.
    async fn seed_defaults(&self) -> AppResult<()>;
}

/// Concrete implementation of RoleAdministration using repository.
pub struct RoleManager {
    repo: Arc<dyn RoleRepository>,
}

impl RoleManager {
    pub fn new(repo: Arc<dyn RoleRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_exists(&self, role: &str) -> AppResult<()> {
        if self.repo.role_exists(role).await? {
            Ok(())
        } else {
            Err(AppError::not_found(format!("role '{}'", role)))
        }
    }
}

#[async_trait]
impl RoleAdministration for RoleManager {
    async fn create_role(&self, name: &str) -> AppResult<String> {
        let name = normalize_role_name(name)?;
        if self.repo.create_role(&name).await? {
            info!(role = %name, "Role created");
        }
        Ok(name)
    }

    async fn delete_role(&self, name: &str) -> AppResult<()> {
        let name = normalize_role_name(name)?;
        if is_super_role(&name) {
            return Err(AppError::conflict("protected role"));
        }
        if !self.repo.role_exists(&name).await? {
            return Ok(());
        }
        if self.repo.count_users_with_role(&name).await? > 0 {
            return Err(AppError::conflict("role in use"));
        }

        if self.repo.delete_role(&name).await? {
            info!(role = %name, "Role deleted");
        }
        Ok(())
    }

    async fn grant_role(&self, user: &str, role: &str) -> AppResult<()> {
        let user = normalize_username(user)?;
        let role = normalize_role_name(role)?;
        self.ensure_exists(&role).await?;

        if self.repo.assign(&user, &role).await? {
            info!(user = %user, role = %role, "Role granted");
        }
        Ok(())
    }

    async fn revoke_role(&self, user: &str, role: &str) -> AppResult<()> {
        let user = normalize_username(user)?;
        let role = normalize_role_name(role)?;

        if self.repo.unassign(&user, &role).await? {
            info!(user = %user, role = %role, "Role revoked");
        }
        Ok(())
    }

    async fn add_capability(&self, role: &str, capability: &str) -> AppResult<()> {
        let role = normalize_role_name(role)?;
        let capability = normalize_capability(capability)?;
        self.ensure_exists(&role).await?;

        if self.repo.grant_capability(&role, &capability).await? {
            info!(role = %role, capability = %capability, "Capability added");
        }
        Ok(())
    }

    async fn remove_capability(&self, role: &str, capability: &str) -> AppResult<()> {
        let role = normalize_role_name(role)?;
        let capability = normalize_capability(capability)?;

        if self.repo.revoke_capability(&role, &capability).await? {
            info!(role = %role, capability = %capability, "Capability removed");
        }
        Ok(())
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleSummary>> {
        let mut summaries = Vec::new();
        for name in self.repo.list_roles().await? {
            let capabilities = self.repo.capabilities_of(&name).await?;
            let users = self.repo.users_with_role(&name).await?;
            summaries.push(RoleSummary {
                name,
                capabilities,
                users,
            });
        }
        Ok(summaries)
    }

    async fn capabilities_of(&self, role: &str) -> AppResult<Vec<String>> {
        let role = normalize_role_name(role)?;
        self.repo.capabilities_of(&role).await
    }

    async fn seed_defaults(&self) -> AppResult<()> {
        for (role, capabilities) in DEFAULT_ROLE_GRANTS {
            self.repo.create_role(role).await?;
            for capability in capabilities.iter() {
                self.repo.grant_capability(role, capability).await?;
            }
        }
        info!("Default roles seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockRoleRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_delete_super_role_is_protected() {
        let mut repo = MockRoleRepository::new();
        repo.expect_delete_role().never();

        let manager = RoleManager::new(Arc::new(repo));
        let err = manager.delete_role("SuperAdmin").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "protected role"));
    }

    #[tokio::test]
    async fn test_delete_role_in_use_conflicts() {
        let mut repo = MockRoleRepository::new();
        repo.expect_role_exists()
            .with(eq("editor"))
            .returning(|_| Ok(true));
        repo.expect_count_users_with_role()
            .with(eq("editor"))
            .returning(|_| Ok(2));
        repo.expect_delete_role().never();

        let manager = RoleManager::new(Arc::new(repo));
        let err = manager.delete_role("editor").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "role in use"));
    }

    #[tokio::test]
    async fn test_delete_role_assigned_meanwhile_conflicts() {
        let mut repo = MockRoleRepository::new();
        repo.expect_role_exists().returning(|_| Ok(true));
        repo.expect_count_users_with_role().returning(|_| Ok(0));
        repo.expect_delete_role()
            .with(eq("editor"))
            .times(1)
            .returning(|_| Err(AppError::conflict("role in use")));

        let manager = RoleManager::new(Arc::new(repo));
        let err = manager.delete_role("editor").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "role in use"));
    }

    #[tokio::test]
    async fn test_delete_absent_role_is_noop() {
        let mut repo = MockRoleRepository::new();
        repo.expect_role_exists().returning(|_| Ok(false));
        repo.expect_count_users_with_role().never();
        repo.expect_delete_role().never();

        let manager = RoleManager::new(Arc::new(repo));

        assert!(manager.delete_role("ghost").await.is_ok());
    }

    #[tokio::test]
    async fn test_grant_unknown_role_not_found() {
        let mut repo = MockRoleRepository::new();
        repo.expect_role_exists().returning(|_| Ok(false));
        repo.expect_assign().never();

        let manager = RoleManager::new(Arc::new(repo));
        let err = manager.grant_role("alice", "ghost").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_role_normalizes_name() {
        let mut repo = MockRoleRepository::new();
        repo.expect_create_role()
            .with(eq("editor"))
            .times(1)
            .returning(|_| Ok(true));

        let manager = RoleManager::new(Arc::new(repo));

        assert_eq!(manager.create_role(" Editor ").await.unwrap(), "editor");
        assert!(matches!(
            manager.create_role("no spaces").await,
            Err(AppError::Validation(_))
        ));
    }
}
