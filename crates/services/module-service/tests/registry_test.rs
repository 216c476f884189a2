//! Module registry and migration tracker tests against in-memory SQLite.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use common::{AppError, AppResult};
use domain::ModuleManifest;
use module_service_lib::catalog::{MigrationCatalog, ModuleMigration};
use module_service_lib::repository::{MigrationRepository, MigrationStore, ModuleStore};
use module_service_lib::service::{MigrationRunner, MigrationTracker, ModuleManager, ModuleRegistry};
use storage::Database;

/// Counts how often it ran; optionally fails every time.
struct Counted {
    name: &'static str,
    runs: Arc<AtomicUsize>,
    fail: bool,
}

impl Counted {
    fn ok(name: &'static str, runs: &Arc<AtomicUsize>) -> Self {
        Self { name, runs: runs.clone(), fail: false }
    }

    fn failing(name: &'static str, runs: &Arc<AtomicUsize>) -> Self {
        Self { name, runs: runs.clone(), fail: true }
    }
}

#[async_trait]
impl ModuleMigration for Counted {
    fn name(&self) -> &str {
        self.name
    }

    async fn apply(&self, _db: &DatabaseConnection) -> AppResult<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AppError::internal("boom"))
        } else {
            Ok(())
        }
    }
}

struct Harness {
    db: DatabaseConnection,
    registry: ModuleManager,
    tracker: Arc<MigrationTracker>,
}

async fn harness(catalog: MigrationCatalog) -> Harness {
    let db = Database::in_memory().await.unwrap().get_connection();
    let tracker = Arc::new(MigrationTracker::new(
        db.clone(),
        Arc::new(MigrationStore::new(db.clone())),
        Arc::new(catalog),
    ));
    let registry = ModuleManager::new(Arc::new(ModuleStore::new(db.clone())), tracker.clone());
    Harness { db, registry, tracker }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_sync_is_idempotent() {
    let runs = Arc::new(AtomicUsize::new(0));
    let h = harness(MigrationCatalog::new().with("blog", Counted::ok("001_init", &runs))).await;
    let manifests = vec![
        ModuleManifest::new("blog", "1.0.0", true),
        ModuleManifest::new("shop", "1.0.0", false),
    ];

    let first = h.registry.sync(&manifests).await;
    assert_eq!((first.added, first.updated), (2, 0));
    assert_eq!(first.migrations.unwrap().executed, vec!["blog/001_init"]);

    let second = h.registry.sync(&manifests).await;
    assert_eq!((second.added, second.updated), (0, 0));
    assert!(second.migrations.is_none());
    assert!(second.errors.is_empty());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_admin_disable_survives_sync() {
    let h = harness(MigrationCatalog::new()).await;

    h.registry
        .sync(&[ModuleManifest::new("m", "1.0.0", true)])
        .await;
    assert!(h.registry.set_enabled("m", false).await.unwrap().is_some());

    let report = h
        .registry
        .sync(&[ModuleManifest::new("m", "1.1.0", true)])
        .await;
    assert_eq!(report.updated, 1);

    let record = h.registry.get("m").await.unwrap().unwrap();
    assert!(!record.enabled);
    assert!(record.admin_toggled);
    assert_eq!(record.version, "1.1.0");
    assert!(h.registry.enabled().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_enabled_unknown_module() {
    let h = harness(MigrationCatalog::new()).await;

    assert!(h.registry.set_enabled("ghost", true).await.unwrap().is_none());
}

#[tokio::test]
async fn test_enabling_runs_pending_migrations() {
    let runs = Arc::new(AtomicUsize::new(0));
    let h = harness(MigrationCatalog::new().with("shop", Counted::ok("001_init", &runs))).await;

    let report = h
        .registry
        .sync(&[ModuleManifest::new("shop", "1.0.0", false)])
        .await;
    assert!(report.migrations.is_none());
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    let enabled = h.registry.set_enabled("shop", true).await.unwrap().unwrap();
    assert_eq!(enabled.executed, vec!["shop/001_init"]);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(h.tracker.is_applied("shop", "001_init").await.unwrap());
}

#[tokio::test]
async fn test_enabling_reports_failed_migration() {
    let runs = Arc::new(AtomicUsize::new(0));
    let h = harness(MigrationCatalog::new().with("shop", Counted::failing("001", &runs))).await;

    h.registry
        .sync(&[ModuleManifest::new("shop", "1.0.0", false)])
        .await;

    let report = h.registry.set_enabled("shop", true).await.unwrap().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(report.has_errors());
    assert!(report.errors[0].starts_with("shop/001:"));

    // The toggle itself stays committed
    assert_eq!(h.registry.enabled().await.unwrap(), vec!["shop"]);
    assert!(!h.tracker.is_applied("shop", "001").await.unwrap());
}

#[tokio::test]
async fn test_migration_runs_at_most_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let h = harness(MigrationCatalog::new().with("m", Counted::ok("001", &runs))).await;
    let enabled = names(&["m"]);

    let first = h.tracker.run_pending(&enabled).await;
    assert_eq!(first.executed, vec!["m/001"]);

    for _ in 0..4 {
        let again = h.tracker.run_pending(&enabled).await;
        assert!(again.executed.is_empty());
        assert_eq!(again.skipped, vec!["m/001"]);
    }

    let (a, b) = tokio::join!(
        h.tracker.run_pending(&enabled),
        h.tracker.run_pending(&enabled)
    );
    assert!(a.executed.is_empty() && b.executed.is_empty());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_first_run_executes_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let h = harness(MigrationCatalog::new().with("m", Counted::ok("001", &runs))).await;
    let enabled = names(&["m"]);

    assert!(!h.tracker.is_applied("m", "001").await.unwrap());

    let (a, b) = tokio::join!(
        h.tracker.run_pending(&enabled),
        h.tracker.run_pending(&enabled)
    );

    let mut executed = a.executed.clone();
    executed.extend(b.executed.clone());
    let mut skipped = a.skipped.clone();
    skipped.extend(b.skipped.clone());

    assert_eq!(executed, vec!["m/001"]);
    assert_eq!(skipped, vec!["m/001"]);
    assert!(a.errors.is_empty() && b.errors.is_empty());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_lost_claim_is_skipped() {
    let runs = Arc::new(AtomicUsize::new(0));
    let h = harness(MigrationCatalog::new().with("m", Counted::ok("001", &runs))).await;
    let store = MigrationStore::new(h.db.clone());

    // Another runner won the claim between the state check and the insert
    assert!(store.claim("m", "001").await.unwrap());
    assert!(!store.claim("m", "001").await.unwrap());

    let report = h.tracker.run_pending(&names(&["m"])).await;
    assert_eq!(report.skipped, vec!["m/001"]);
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    // A claim left behind by a dead runner is cleared by releasing it
    store.release("m", "001").await.unwrap();
    let report = h.tracker.run_pending(&names(&["m"])).await;
    assert_eq!(report.executed, vec!["m/001"]);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failure_is_isolated_and_retried() {
    let a = Arc::new(AtomicUsize::new(0));
    let b = Arc::new(AtomicUsize::new(0));
    let c = Arc::new(AtomicUsize::new(0));
    let catalog = MigrationCatalog::new()
        .with("a", Counted::ok("001", &a))
        .with("b", Counted::failing("001", &b))
        .with("c", Counted::ok("001", &c));
    let h = harness(catalog).await;
    let enabled = names(&["a", "b", "c"]);

    let report = h.tracker.run_pending(&enabled).await;
    assert_eq!(report.executed, vec!["a/001", "c/001"]);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("b/001:"));

    assert!(h.tracker.is_applied("a", "001").await.unwrap());
    assert!(!h.tracker.is_applied("b", "001").await.unwrap());
    assert!(h.tracker.is_applied("c", "001").await.unwrap());

    // The failed one stays pending and is attempted again
    let retry = h.tracker.run_pending(&enabled).await;
    assert_eq!(retry.skipped, vec!["a/001", "c/001"]);
    assert_eq!(b.load(Ordering::SeqCst), 2);
    assert_eq!(a.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_migrations_run_in_name_order() {
    let runs = Arc::new(AtomicUsize::new(0));
    let catalog = MigrationCatalog::new()
        .with("m", Counted::ok("002_second", &runs))
        .with("m", Counted::ok("001_first", &runs));
    let h = harness(catalog).await;

    let report = h.tracker.run_pending(&names(&["m"])).await;

    assert_eq!(report.executed, vec!["m/001_first", "m/002_second"]);
}

#[tokio::test]
async fn test_mark_applied_and_status() {
    let runs = Arc::new(AtomicUsize::new(0));
    let catalog = MigrationCatalog::new()
        .with("m", Counted::ok("001", &runs))
        .with("m", Counted::ok("002", &runs));
    let h = harness(catalog).await;

    h.tracker.mark_applied("m", "001").await.unwrap();
    h.tracker.mark_applied("m", "001").await.unwrap();

    let status = h.tracker.status(&names(&["m"])).await.unwrap();
    assert_eq!(status.len(), 2);
    assert!(status[0].is_applied());
    assert!(!status[1].is_applied());

    let report = h.tracker.run_pending(&names(&["m"])).await;
    assert_eq!(report.executed, vec!["m/002"]);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
