//! Command implementations.

pub mod access;
pub mod migrations;
pub mod modules;
pub mod pages;
pub mod roles;
pub mod schema;

use std::path::Path;

use access_service_lib::AccessServices;
use common::{config::AppConfig, AppResult};
use domain::ModuleManifest;
use module_service_lib::catalog::MigrationCatalog;
use module_service_lib::infra::ManifestSource;
use module_service_lib::ModuleServices;
use storage::Database;

/// Everything a command needs, wired to one migrated database.
pub struct Context {
    pub access: AccessServices,
    pub modules: ModuleServices,
    pub manifests: Vec<ModuleManifest>,
}

impl Context {
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        Self::connect_with(config, &config.modules_dir).await
    }

    /// Connect and read manifests from `modules_dir`. Unreadable manifests
    /// are logged and left out.
    pub async fn connect_with(config: &AppConfig, modules_dir: &Path) -> AppResult<Self> {
        let db = Database::connect(&config.database).await?.get_connection();

        let scan = ManifestSource::new(modules_dir).scan()?;
        for error in &scan.errors {
            tracing::warn!("{}", error);
        }

        let access = AccessServices::from_connection(db.clone());
        let modules = ModuleServices::from_connection(
            db,
            &access,
            MigrationCatalog::builtin(),
            scan.manifests.clone(),
        );

        Ok(Self {
            access,
            modules,
            manifests: scan.manifests,
        })
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
