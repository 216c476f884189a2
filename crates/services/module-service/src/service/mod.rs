//! Service layer for modules, migrations, navigation and pages.

mod admin_entries;
mod navigation;
mod pages;
mod registry;
mod tracker;

pub use admin_entries::{AdminEntry, AdminEntryRegistry};
pub use navigation::NavigationBuilder;
pub use pages::{PageManager, PageService};
pub use registry::{ModuleManager, ModuleRegistry};
pub use tracker::{MigrationRunner, MigrationTracker};

#[cfg(any(test, feature = "test-utils"))]
pub use tracker::MockMigrationRunner;
