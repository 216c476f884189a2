//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! All types here are shared by the access and module services.

pub mod constants;
pub mod error;
pub mod migration;
pub mod module;
pub mod page;
pub mod role;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use migration::{MigrationRecord, MigrationReport, MigrationStatus};
pub use module::{
    MenuItem, ModuleManifest, ModuleRecord, NavEntry, NavKind, NavigationSections, SyncReport,
    Visibility,
};
pub use page::{normalize_slug, NewPage, Page, PageStatus};
pub use role::{normalize_capability, normalize_role_name, normalize_username, RoleSummary};
pub use user::{age_between, UserProfile};
