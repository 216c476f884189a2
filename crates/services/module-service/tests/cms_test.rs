//! Navigation, admin entries, pages and bundled migrations against
//! in-memory SQLite with the real access services.

use sea_orm::DatabaseConnection;
use sea_orm_migration::SchemaManager;

use access_service_lib::service::RoleAdministration;
use access_service_lib::AccessServices;
use common::AppError;
use domain::{ModuleManifest, NavEntry, NavKind, NewPage, PageStatus};
use module_service_lib::catalog::MigrationCatalog;
use module_service_lib::service::{MigrationRunner, ModuleRegistry, PageService};
use module_service_lib::ModuleServices;
use storage::Database;

fn manifests() -> Vec<ModuleManifest> {
    vec![
        ModuleManifest::new("modules", "1.0.0", true).with_nav(
            NavKind::Admin,
            NavEntry::new("Modules", "/admin/modules", 10).requiring("manage_modules"),
        ),
        ModuleManifest::new("pages", "1.0.0", true).with_nav(
            NavKind::Admin,
            NavEntry::new("Pages", "/admin/pages", 20).requiring("edit_content"),
        ),
    ]
}

async fn setup(catalog: MigrationCatalog) -> (DatabaseConnection, AccessServices, ModuleServices) {
    let db = Database::in_memory().await.unwrap().get_connection();
    let access = AccessServices::from_connection(db.clone());
    let modules = ModuleServices::from_connection(db.clone(), &access, catalog, manifests());
    (db, access, modules)
}

#[tokio::test]
async fn test_admin_menu_follows_capabilities() {
    let (_db, access, modules) = setup(MigrationCatalog::new()).await;
    modules.registry.sync(&manifests()).await;

    access.roles.create_role("editor").await.unwrap();
    access.roles.add_capability("editor", "edit_content").await.unwrap();
    access.roles.grant_role("ed", "editor").await.unwrap();
    access.roles.create_role("superadmin").await.unwrap();
    access.roles.grant_role("root", "superadmin").await.unwrap();

    let editor = modules.navigation.build_menu(NavKind::Admin, Some("ed")).await;
    let titles: Vec<_> = editor.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Pages"]);

    let root = modules.navigation.build_menu(NavKind::Admin, Some("root")).await;
    let titles: Vec<_> = root.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Modules", "Pages"]);

    assert!(modules.navigation.build_menu(NavKind::Admin, None).await.is_empty());

    modules.registry.set_enabled("pages", false).await.unwrap().unwrap();
    assert!(modules.navigation.build_menu(NavKind::Admin, Some("ed")).await.is_empty());
}

#[tokio::test]
async fn test_admin_entries_for_user() {
    let (_db, access, modules) = setup(MigrationCatalog::new()).await;
    modules.registry.sync(&manifests()).await;
    access.roles.seed_defaults().await.unwrap();
    access.roles.grant_role("ed", "editor").await.unwrap();

    let enabled = modules.registry.enabled().await.unwrap();
    let entries = modules
        .admin_entries
        .entries_for("ed", access.resolver.as_ref(), &enabled)
        .await;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].href, "/backend/modules/modules/controller.php");
}

#[tokio::test]
async fn test_page_lifecycle() {
    let (_db, _access, modules) = setup(MigrationCatalog::new()).await;
    let pages = &modules.pages;

    let about = pages
        .create(NewPage::new("about", "About").with_content("Hi"))
        .await
        .unwrap();
    let home = pages.create(NewPage::new("", "Home").published()).await.unwrap();
    pages.create(NewPage::new("blog/intro", "Intro")).await.unwrap();

    let err = pages.create(NewPage::new("about", "Again")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(pages.create(NewPage::new("Bad Slug", "X")).await.is_err());
    assert!(pages.create(NewPage::new("ok", " ")).await.is_err());

    let listed: Vec<_> = pages.list().await.unwrap().into_iter().map(|p| p.slug).collect();
    assert_eq!(listed, vec!["", "about", "blog/intro"]);

    assert!(pages.published("about").await.unwrap().is_none());
    assert_eq!(pages.published("").await.unwrap().unwrap().id, home.id);

    let updated = pages
        .update(about.id, NewPage::new("about", "About us").published())
        .await
        .unwrap();
    assert_eq!(updated.status, PageStatus::Published);
    assert_eq!(pages.published("about").await.unwrap().unwrap().title, "About us");

    pages.delete(about.id).await.unwrap();
    assert!(matches!(pages.get(about.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(pages.delete(about.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_builtin_migrations_apply_once() {
    let (db, _access, modules) = setup(MigrationCatalog::builtin()).await;
    let enabled: Vec<String> = ["identity", "person", "projectplaypress"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let first = modules.tracker.run_pending(&enabled).await;
    assert!(first.errors.is_empty(), "{:?}", first.errors);
    assert_eq!(first.executed.len(), 3);

    let manager = SchemaManager::new(&db);
    assert!(manager.has_column("users", "kyc_status").await.unwrap());
    assert!(manager.has_column("users", "doc_type").await.unwrap());
    assert!(manager.has_table("person_profile").await.unwrap());

    let slugs: Vec<_> = modules
        .pages
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.slug)
        .collect();
    assert_eq!(slugs, vec!["", "login", "profil"]);

    let second = modules.tracker.run_pending(&enabled).await;
    assert!(second.executed.is_empty());
    assert_eq!(second.skipped.len(), 3);
}
