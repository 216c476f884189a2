//! Module registry and manifest synchronization.
//!
//! `sync` creates missing records and follows version changes. Once a
//! record exists its `enabled` flag belongs to the administrator: sync
//! never writes it again.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::AppResult;
use domain::{MigrationReport, ModuleManifest, ModuleRecord, SyncReport};

use crate::repository::ModuleRepository;
use crate::service::MigrationRunner;

/// Module registry trait for dependency injection.
#[async_trait]
pub trait ModuleRegistry: Send + Sync {
    /// Reconcile stored modules with `manifests`. Never fails as a whole;
    /// per-module problems are listed in the report.
    async fn sync(&self, manifests: &[ModuleManifest]) -> SyncReport;

    /// Administrator toggle. `Ok(None)` when the module is unknown; otherwise
    /// the report of the migration run an enable triggers (empty on disable).
    async fn set_enabled(&self, name: &str, enabled: bool)
        -> AppResult<Option<MigrationReport>>;

    /// All modules ordered by name
    async fn list(&self) -> AppResult<Vec<ModuleRecord>>;

    /// Names of enabled modules, ordered
    async fn enabled(&self) -> AppResult<Vec<String>>;

    async fn get(&self, name: &str) -> AppResult<Option<ModuleRecord>>;
}

enum Outcome {
    Added,
    Updated,
    Unchanged,
}

/// Concrete implementation of ModuleRegistry
pub struct ModuleManager {
    repo: Arc<dyn ModuleRepository>,
    migrations: Arc<dyn MigrationRunner>,
}

impl ModuleManager {
    pub fn new(repo: Arc<dyn ModuleRepository>, migrations: Arc<dyn MigrationRunner>) -> Self {
        Self { repo, migrations }
    }

    async fn sync_one(&self, manifest: &ModuleManifest) -> AppResult<Outcome> {
        match self.repo.find(&manifest.name).await? {
            None => {
                let inserted = self
                    .repo
                    .insert_if_absent(&manifest.name, &manifest.version, manifest.enabled_by_default)
                    .await?;
                if inserted {
                    info!(module = %manifest.name, version = %manifest.version, "Module registered");
                    Ok(Outcome::Added)
                } else {
                    // Registered concurrently; that writer owns the first version
                    Ok(Outcome::Unchanged)
                }
            }
            Some(record) if record.version != manifest.version => {
                if self
                    .repo
                    .update_version(&manifest.name, &manifest.version)
                    .await?
                {
                    info!(
                        module = %manifest.name,
                        from = %record.version,
                        to = %manifest.version,
                        "Module version changed"
                    );
                    Ok(Outcome::Updated)
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            Some(_) => Ok(Outcome::Unchanged),
        }
    }

    async fn run_migrations(&self) -> AppResult<MigrationReport> {
        let enabled = self.repo.list_enabled().await?;
        let report = self.migrations.run_pending(&enabled).await;
        for err in &report.errors {
            warn!(error = %err, "Module migration failed");
        }
        Ok(report)
    }
}

#[async_trait]
impl ModuleRegistry for ModuleManager {
    async fn sync(&self, manifests: &[ModuleManifest]) -> SyncReport {
        let mut report = SyncReport::default();
        let mut migrate = false;

        for manifest in manifests {
            let manifest = match manifest.clone().normalized() {
                Ok(m) => m,
                Err(e) => {
                    warn!(module = %manifest.name, error = %e, "Skipping invalid manifest");
                    report.errors.push(format!("{}: {}", manifest.name, e));
                    continue;
                }
            };

            match self.sync_one(&manifest).await {
                Ok(Outcome::Added) => {
                    report.added += 1;
                    migrate |= manifest.enabled_by_default;
                }
                Ok(Outcome::Updated) => {
                    report.updated += 1;
                    migrate = true;
                }
                Ok(Outcome::Unchanged) => {}
                Err(e) => {
                    warn!(module = %manifest.name, error = %e, "Module sync failed");
                    report.errors.push(format!("{}: {}", manifest.name, e));
                }
            }
        }

        if migrate {
            match self.run_migrations().await {
                Ok(migrations) => report.migrations = Some(migrations),
                Err(e) => {
                    warn!(error = %e, "Could not start module migrations");
                    report.errors.push(format!("migrations: {}", e));
                }
            }
        }

        info!(added = report.added, updated = report.updated, "Module sync finished");
        report
    }

    async fn set_enabled(
        &self,
        name: &str,
        enabled: bool,
    ) -> AppResult<Option<MigrationReport>> {
        let name = name.trim().to_lowercase();
        if !self.repo.set_enabled(&name, enabled).await? {
            return Ok(None);
        }
        info!(module = %name, enabled, "Module toggled");

        if !enabled {
            return Ok(Some(MigrationReport::default()));
        }

        // The toggle is committed; a failed run is reported, not returned
        let report = match self.run_migrations().await {
            Ok(report) => report,
            Err(e) => {
                warn!(module = %name, error = %e, "Could not start module migrations");
                MigrationReport {
                    errors: vec![format!("migrations: {}", e)],
                    ..MigrationReport::default()
                }
            }
        };
        Ok(Some(report))
    }

    async fn list(&self) -> AppResult<Vec<ModuleRecord>> {
        self.repo.list().await
    }

    async fn enabled(&self) -> AppResult<Vec<String>> {
        self.repo.list_enabled().await
    }

    async fn get(&self, name: &str) -> AppResult<Option<ModuleRecord>> {
        self.repo.find(&name.trim().to_lowercase()).await
    }
}
