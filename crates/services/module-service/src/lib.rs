//! Module Service Library
//!
//! Module registry synchronized from manifests, the module migration
//! tracker, navigation and admin entries built from manifests, and the
//! page CMS.

pub mod catalog;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use access_service_lib::AccessServices;
use domain::ModuleManifest;

use crate::catalog::MigrationCatalog;
use crate::repository::{MigrationStore, ModuleStore, PageStore};
use crate::service::{
    AdminEntryRegistry, MigrationTracker, ModuleManager, NavigationBuilder, PageManager,
};

/// Module components wired to one connection.
#[derive(Clone)]
pub struct ModuleServices {
    pub registry: Arc<ModuleManager>,
    pub tracker: Arc<MigrationTracker>,
    pub navigation: Arc<NavigationBuilder>,
    pub admin_entries: Arc<AdminEntryRegistry>,
    pub pages: Arc<PageManager>,
}

impl ModuleServices {
    /// Wire everything. `manifests` feed navigation and admin entries.
    pub fn from_connection(
        db: DatabaseConnection,
        access: &AccessServices,
        catalog: MigrationCatalog,
        manifests: Vec<ModuleManifest>,
    ) -> Self {
        let module_repo = Arc::new(ModuleStore::new(db.clone()));
        let tracker = Arc::new(MigrationTracker::new(
            db.clone(),
            Arc::new(MigrationStore::new(db.clone())),
            Arc::new(catalog),
        ));

        Self {
            registry: Arc::new(ModuleManager::new(module_repo.clone(), tracker.clone())),
            admin_entries: Arc::new(AdminEntryRegistry::from_manifests(&manifests)),
            navigation: Arc::new(NavigationBuilder::new(
                module_repo,
                access.resolver.clone(),
                access.users.clone(),
                manifests,
            )),
            tracker,
            pages: Arc::new(PageManager::new(Arc::new(PageStore::new(db)))),
        }
    }
}
