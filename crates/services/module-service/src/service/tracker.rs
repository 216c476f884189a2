//! Module migration tracker.
//!
//! Runs every catalog migration of the enabled modules at most once. The
//! (module, name) record is claimed with a conditional insert *before* the
//! migration runs, so concurrent runners cannot both execute it. A failed
//! migration releases its claim and is retried on the next run.
//!
//! A claim reads as applied from the moment it is written. If the process
//! dies inside `apply`, the claim is never released and the migration is not
//! retried; recover with `MigrationRepository::release` after checking the
//! schema by hand. Bundled migrations check before they change anything, so
//! rerunning one after a release is safe.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use common::AppResult;
use domain::{MigrationReport, MigrationStatus};

use crate::catalog::MigrationCatalog;
use crate::repository::MigrationRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Migration runner trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MigrationRunner: Send + Sync {
    async fn is_applied(&self, module: &str, name: &str) -> AppResult<bool>;

    /// Record a migration as applied without running it. Idempotent.
    async fn mark_applied(&self, module: &str, name: &str) -> AppResult<()>;

    /// Run pending migrations of the given modules. Per-migration failures
    /// end up in the report.
    async fn run_pending(&self, enabled_modules: &[String]) -> MigrationReport;

    /// Catalog migrations of `modules` joined with their applied state
    async fn status(&self, modules: &[String]) -> AppResult<Vec<MigrationStatus>>;
}

/// Concrete implementation of MigrationRunner
pub struct MigrationTracker {
    db: DatabaseConnection,
    repo: Arc<dyn MigrationRepository>,
    catalog: Arc<MigrationCatalog>,
}

impl MigrationTracker {
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<dyn MigrationRepository>,
        catalog: Arc<MigrationCatalog>,
    ) -> Self {
        Self { db, repo, catalog }
    }

    pub fn catalog(&self) -> &MigrationCatalog {
        &self.catalog
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[async_trait]
impl MigrationRunner for MigrationTracker {
    async fn is_applied(&self, module: &str, name: &str) -> AppResult<bool> {
        self.repo.is_applied(&normalize(module), name.trim()).await
    }

    async fn mark_applied(&self, module: &str, name: &str) -> AppResult<()> {
        let module = normalize(module);
        if self.repo.claim(&module, name.trim()).await? {
            info!(module = %module, migration = %name, "Migration marked as applied");
        }
        Ok(())
    }

    async fn run_pending(&self, enabled_modules: &[String]) -> MigrationReport {
        let mut report = MigrationReport::default();
        let mut modules: Vec<String> = enabled_modules.iter().map(|m| normalize(m)).collect();
        modules.sort();
        modules.dedup();

        for module in &modules {
            for migration in self.catalog.for_module(module) {
                let name = migration.name();
                let key = MigrationReport::key(module, name);

                match self.repo.is_applied(module, name).await {
                    Ok(true) => {
                        report.skipped.push(key);
                        continue;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!(migration = %key, error = %e, "Could not read migration state");
                        report.errors.push(format!("{}: {}", key, e));
                        continue;
                    }
                }

                match self.repo.claim(module, name).await {
                    Ok(true) => {}
                    Ok(false) => {
                        // Another runner got here first
                        report.skipped.push(key);
                        continue;
                    }
                    Err(e) => {
                        warn!(migration = %key, error = %e, "Could not claim migration");
                        report.errors.push(format!("{}: {}", key, e));
                        continue;
                    }
                }

                match migration.apply(&self.db).await {
                    Ok(()) => {
                        if let Err(e) = self.repo.touch(module, name).await {
                            warn!(migration = %key, error = %e, "Could not refresh applied_at");
                        }
                        info!(migration = %key, "Migration applied");
                        report.executed.push(key);
                    }
                    Err(e) => {
                        error!(migration = %key, error = %e, "Migration failed");
                        if let Err(release) = self.repo.release(module, name).await {
                            error!(migration = %key, error = %release, "Could not release failed migration");
                        }
                        report.errors.push(format!("{}: {}", key, e));
                    }
                }
            }
        }

        report
    }

    async fn status(&self, modules: &[String]) -> AppResult<Vec<MigrationStatus>> {
        let mut statuses = Vec::new();

        for module in modules.iter().map(|m| normalize(m)) {
            let applied: HashMap<String, _> = self
                .repo
                .list_for(&module)
                .await?
                .into_iter()
                .map(|r| (r.name, r.applied_at))
                .collect();

            for migration in self.catalog.for_module(&module) {
                statuses.push(MigrationStatus {
                    module: module.clone(),
                    name: migration.name().to_string(),
                    applied_at: applied.get(migration.name()).copied(),
                });
            }
        }

        Ok(statuses)
    }
}
