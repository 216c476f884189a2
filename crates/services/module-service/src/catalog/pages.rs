//! projectplaypress: default pages.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::debug;

use common::AppResult;
use domain::NewPage;

use super::ModuleMigration;
use crate::repository::{PageRepository, PageStore};

/// (slug, title, content, override path)
const DEFAULT_PAGES: &[(&str, &str, &str, &str)] = &[
    (
        "",
        "Startseite",
        "Welcome. This page can be edited in the admin area.",
        "/frontend/overrides/system/pages/home.php",
    ),
    (
        "login",
        "Login",
        "Login page (served by its override file).",
        "/frontend/overrides/system/pages/login.php",
    ),
    (
        "profil",
        "Profil",
        "Profile page (rendered by the person module).",
        "/frontend/overrides/person/profile.php",
    ),
];

pub struct SeedPages;

#[async_trait]
impl ModuleMigration for SeedPages {
    fn name(&self) -> &str {
        "001_ppp_pages"
    }

    async fn apply(&self, db: &DatabaseConnection) -> AppResult<()> {
        let pages = PageStore::new(db.clone());

        for (slug, title, content, override_path) in DEFAULT_PAGES {
            let page = NewPage {
                override_path: Some(override_path.to_string()),
                ..NewPage::new(*slug, *title).published().with_content(*content)
            };
            if pages.insert_if_absent(page).await? {
                debug!(slug = %slug, "Seeded page");
            }
        }

        Ok(())
    }
}
