//! Page CMS.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use common::{AppError, AppResult, OptionExt};
use domain::{normalize_slug, NewPage, Page};

use crate::repository::PageRepository;

/// Page service trait for dependency injection.
#[async_trait]
pub trait PageService: Send + Sync {
    async fn create(&self, page: NewPage) -> AppResult<Page>;

    async fn update(&self, id: i32, page: NewPage) -> AppResult<Page>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// All pages, home first, then by slug
    async fn list(&self) -> AppResult<Vec<Page>>;

    async fn get(&self, id: i32) -> AppResult<Page>;

    /// Published page for `slug`; drafts and unknown slugs are `None`
    async fn published(&self, slug: &str) -> AppResult<Option<Page>>;
}

/// Concrete implementation of PageService using repository.
pub struct PageManager {
    repo: Arc<dyn PageRepository>,
}

impl PageManager {
    pub fn new(repo: Arc<dyn PageRepository>) -> Self {
        Self { repo }
    }

    async fn ensure_slug_free(&self, slug: &str, except: Option<i32>) -> AppResult<()> {
        match self.repo.find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(AppError::validation("slug already in use"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PageService for PageManager {
    async fn create(&self, page: NewPage) -> AppResult<Page> {
        let page = page.normalized()?;
        self.ensure_slug_free(&page.slug, None).await?;

        let created = self.repo.insert(page).await?;
        info!(id = created.id, slug = %created.slug, "Page created");
        Ok(created)
    }

    async fn update(&self, id: i32, page: NewPage) -> AppResult<Page> {
        let page = page.normalized()?;
        self.ensure_slug_free(&page.slug, Some(id)).await?;

        let updated = self
            .repo
            .update(id, page)
            .await?
            .ok_or_not_found(format!("page {}", id))?;
        info!(id, slug = %updated.slug, "Page updated");
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found(format!("page {}", id)));
        }
        info!(id, "Page deleted");
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<Page>> {
        let mut pages = self.repo.list().await?;
        pages.sort_by(|a, b| {
            b.is_home()
                .cmp(&a.is_home())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Ok(pages)
    }

    async fn get(&self, id: i32) -> AppResult<Page> {
        self.repo
            .find(id)
            .await?
            .ok_or_not_found(format!("page {}", id))
    }

    async fn published(&self, slug: &str) -> AppResult<Option<Page>> {
        let Ok(slug) = normalize_slug(slug) else {
            return Ok(None);
        };
        let page = self.repo.find_by_slug(&slug).await?;
        Ok(page.filter(Page::is_published))
    }
}
