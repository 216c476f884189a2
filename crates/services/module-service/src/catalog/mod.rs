//! Module migration units and the per-module catalog.
//!
//! Migrations are registered explicitly; nothing is discovered from the
//! filesystem. Within a module they run in lexicographic name order.

mod identity;
mod pages;
mod person;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use common::AppResult;

pub use identity::UsersKyc;
pub use pages::SeedPages;
pub use person::PersonProfile;

/// A named, one-time schema or data change owned by a module.
///
/// `apply` should itself be idempotent; the tracker only guarantees it is
/// not *recorded* twice.
#[async_trait]
pub trait ModuleMigration: Send + Sync {
    fn name(&self) -> &str;

    async fn apply(&self, db: &DatabaseConnection) -> AppResult<()>;
}

/// Migrations grouped by module name
#[derive(Clone, Default)]
pub struct MigrationCatalog {
    modules: BTreeMap<String, Vec<Arc<dyn ModuleMigration>>>,
}

impl MigrationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the migrations shipped by the bundled modules
    pub fn builtin() -> Self {
        Self::new()
            .with("identity", UsersKyc)
            .with("person", PersonProfile)
            .with("projectplaypress", SeedPages)
    }

    /// Register a migration. A second one with the same name replaces the first.
    pub fn register(&mut self, module: &str, migration: Arc<dyn ModuleMigration>) {
        let list = self
            .modules
            .entry(module.trim().to_lowercase())
            .or_default();
        list.retain(|m| m.name() != migration.name());
        list.push(migration);
        list.sort_by(|a, b| a.name().cmp(b.name()));
    }

    pub fn with(mut self, module: &str, migration: impl ModuleMigration + 'static) -> Self {
        self.register(module, Arc::new(migration));
        self
    }

    /// Ordered migrations of `module`; empty when it has none
    pub fn for_module(&self, module: &str) -> &[Arc<dyn ModuleMigration>] {
        self.modules
            .get(module)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Modules that own at least one migration
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
