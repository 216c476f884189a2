//! CMS page types and slug rules.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{DomainError, DomainResult};

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9/-]+$").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
        }
    }
}

impl std::str::FromStr for PageStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PageStatus::Draft),
            "published" => Ok(PageStatus::Published),
            other => Err(DomainError::validation(format!(
                "Unknown page status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored page. An empty slug is the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub status: PageStatus,
    pub content: String,
    pub template: Option<String>,
    pub override_path: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn is_home(&self) -> bool {
        self.slug.is_empty()
    }

    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }
}

/// Page input for create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewPage {
    #[serde(default)]
    #[validate(length(max = 190))]
    pub slug: String,
    #[validate(length(min = 1, max = 190))]
    pub title: String,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default)]
    pub content: String,
    pub template: Option<String>,
    pub override_path: Option<String>,
}

impl NewPage {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn published(mut self) -> Self {
        self.status = PageStatus::Published;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Trim slug and title, blank optional paths, then validate.
    pub fn normalized(mut self) -> DomainResult<Self> {
        self.slug = normalize_slug(&self.slug)?;
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(DomainError::validation("Page title must not be empty"));
        }
        self.template = self.template.filter(|t| !t.trim().is_empty());
        self.override_path = self.override_path.filter(|p| !p.trim().is_empty());
        self.validate()?;
        Ok(self)
    }
}

/// Trim a slug and check it is empty (home) or `[a-z0-9/-]+`.
pub fn normalize_slug(raw: &str) -> DomainResult<String> {
    let slug = raw.trim();
    if !slug.is_empty() && !SLUG_RE.is_match(slug) {
        return Err(DomainError::validation(
            "Slug may only contain a-z, 0-9, '/' and '-'",
        ));
    }
    Ok(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rules() {
        assert_eq!(normalize_slug("  ").unwrap(), "");
        assert_eq!(normalize_slug(" blog/first-post ").unwrap(), "blog/first-post");
        assert!(normalize_slug("Blog").is_err());
        assert!(normalize_slug("a b").is_err());
        assert!(normalize_slug("x?y").is_err());
    }

    #[test]
    fn test_new_page_requires_title() {
        assert!(NewPage::new("about", "   ").normalized().is_err());

        let page = NewPage::new(" about ", " About us ").normalized().unwrap();
        assert_eq!(page.slug, "about");
        assert_eq!(page.title, "About us");
        assert_eq!(page.status, PageStatus::Draft);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Published".parse::<PageStatus>().unwrap(), PageStatus::Published);
        assert!("archived".parse::<PageStatus>().is_err());
    }
}
