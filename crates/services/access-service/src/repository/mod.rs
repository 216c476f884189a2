//! Repository layer for data access.

pub mod entities;
mod role_repository;
mod user_repository;

pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserDirectory, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserDirectory;
