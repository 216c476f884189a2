//! Repository layer for data access.

pub mod entities;
mod migration_repository;
mod module_repository;
mod page_repository;

pub use migration_repository::{MigrationRepository, MigrationStore};
pub use module_repository::{ModuleRepository, ModuleStore};
pub use page_repository::{PageRepository, PageStore};

#[cfg(any(test, feature = "test-utils"))]
pub use migration_repository::MockMigrationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use module_repository::MockModuleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use page_repository::MockPageRepository;
