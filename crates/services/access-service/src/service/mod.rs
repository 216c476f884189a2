//! Service layer for access control.

mod access_control;
mod role_admin;

pub use access_control::{AccessControl, CapabilityResolver};
pub use role_admin::{RoleAdministration, RoleManager};

#[cfg(any(test, feature = "test-utils"))]
pub use access_control::MockCapabilityResolver;
