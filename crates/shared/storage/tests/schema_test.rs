//! Schema bootstrap tests against in-memory SQLite.

use sea_orm_migration::SchemaManager;
use storage::{Database, Migrator};

#[tokio::test]
async fn test_in_memory_creates_core_tables() {
    let db = Database::in_memory().await.unwrap();
    let manager = SchemaManager::new(db.connection());

    for table in [
        "users",
        "roles",
        "role_capabilities",
        "user_roles",
        "modules",
        "migration_records",
        "pages",
    ] {
        assert!(manager.has_table(table).await.unwrap(), "missing {}", table);
    }
    db.ping().await.unwrap();
}

#[tokio::test]
async fn test_migration_status_lists_all_applied() {
    use sea_orm_migration::MigratorTrait;

    let db = Database::in_memory().await.unwrap();
    let status = db.migration_status().await.unwrap();

    assert_eq!(status.len(), Migrator::migrations().len());
    assert!(status.iter().all(|(_, applied)| *applied));
}

#[tokio::test]
async fn test_rollback_then_up_again() {
    let db = Database::in_memory().await.unwrap();

    db.rollback_migration().await.unwrap();
    let manager = SchemaManager::new(db.connection());
    assert!(!manager.has_table("pages").await.unwrap());

    db.run_migrations().await.unwrap();
    assert!(manager.has_table("pages").await.unwrap());
}
