//! Capability resolution.
//!
//! Answers "may this user do X" from the role grants. Store failures never
//! escape: every check denies and logs instead.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use common::{AppError, AppResult};
use domain::is_super_role;

use crate::repository::RoleRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Capability resolver trait for dependency injection.
///
/// Usernames and capabilities compare case-insensitively. The super-role
/// holds every capability without explicit grants.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CapabilityResolver: Send + Sync {
    /// Whether `user` holds `capability`. Empty input and store failures deny.
    async fn has_capability(&self, user: &str, capability: &str) -> bool;

    /// Whether `user` holds every one of `capabilities` (empty list allows)
    async fn has_all(&self, user: &str, capabilities: &[String]) -> bool;

    /// Whether `user` is assigned `role`
    async fn has_role(&self, user: &str, role: &str) -> bool;

    /// Roles assigned to `user`; empty on failure
    async fn roles_of(&self, user: &str) -> BTreeSet<String>;

    /// `Forbidden` unless `user` holds `capability`
    async fn require(&self, user: &str, capability: &str) -> AppResult<()>;
}

/// Concrete implementation of CapabilityResolver backed by the role store
pub struct AccessControl {
    repo: Arc<dyn RoleRepository>,
}

impl AccessControl {
    pub fn new(repo: Arc<dyn RoleRepository>) -> Self {
        Self { repo }
    }

    async fn check_all(&self, user: &str, capabilities: &[String]) -> AppResult<bool> {
        let roles = self.repo.roles_of(user).await?;
        if roles.iter().any(|r| is_super_role(r)) {
            return Ok(true);
        }
        if roles.is_empty() {
            return Ok(capabilities.is_empty());
        }

        for capability in capabilities {
            if !self.repo.any_role_has_capability(&roles, capability).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[async_trait]
impl CapabilityResolver for AccessControl {
    async fn has_capability(&self, user: &str, capability: &str) -> bool {
        let capability = normalize(capability);
        if capability.is_empty() {
            return false;
        }
        self.has_all(user, std::slice::from_ref(&capability)).await
    }

    async fn has_all(&self, user: &str, capabilities: &[String]) -> bool {
        let user = normalize(user);
        let capabilities: Vec<String> = capabilities.iter().map(|c| normalize(c)).collect();
        if capabilities.iter().any(|c| c.is_empty()) {
            return false;
        }
        if user.is_empty() {
            return capabilities.is_empty();
        }

        match self.check_all(&user, &capabilities).await {
            Ok(allowed) => {
                debug!(user = %user, ?capabilities, allowed, "Capability check");
                allowed
            }
            Err(e) => {
                warn!(user = %user, ?capabilities, error = %e, "Capability check failed, denying");
                false
            }
        }
    }

    async fn has_role(&self, user: &str, role: &str) -> bool {
        let role = normalize(role);
        if role.is_empty() {
            return false;
        }
        self.roles_of(user).await.contains(&role)
    }

    async fn roles_of(&self, user: &str) -> BTreeSet<String> {
        let user = normalize(user);
        if user.is_empty() {
            return BTreeSet::new();
        }

        match self.repo.roles_of(&user).await {
            Ok(roles) => roles.into_iter().collect(),
            Err(e) => {
                warn!(user = %user, error = %e, "Role lookup failed, returning none");
                BTreeSet::new()
            }
        }
    }

    async fn require(&self, user: &str, capability: &str) -> AppResult<()> {
        if self.has_capability(user, capability).await {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
